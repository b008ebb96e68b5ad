use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn run_shell(dir: &Path, args: &[&str], input: &str) -> anyhow::Result<Output> {
    run_shell_with_env(dir, args, &[], input)
}

fn run_shell_with_env(
    dir: &Path,
    args: &[&str],
    env: &[(&str, &str)],
    input: &str,
) -> anyhow::Result<Output> {
    let mut child = Command::new(env!("CARGO_BIN_EXE_sim-shell"))
        .args(args)
        .current_dir(dir)
        .env_remove("SIM_SHELL_CLOCK_FILE")
        .env_remove("RUST_LOG")
        .envs(env.iter().copied())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())?;

    Ok(child.wait_with_output()?)
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_date_override_survives_restart() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;

    let output = run_shell(temp_dir.path(), &[], "date\ny\n07 04 2030\nexit\n")?;
    assert!(
        output.status.success(),
        "Command failed: {:?}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout_of(&output).contains("Date updated to: 07/04/2030"));

    let record = fs::read(temp_dir.path().join("simulated_time.dat"))?;
    assert_eq!(record.len(), 8);

    let output = run_shell(temp_dir.path(), &[], "date\nn\nexit\n")?;
    assert!(output.status.success());
    assert!(stdout_of(&output).contains("Current date (simulated): 07/04/2030"));

    Ok(())
}

#[test]
fn test_time_override_survives_restart() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;

    let output = run_shell(temp_dir.path(), &[], "time\ny\n06 30 00\n")?;
    assert!(stdout_of(&output).contains("Time updated to: 06:30:00 AM"));

    let output = run_shell(temp_dir.path(), &[], "time\nn\n")?;
    assert!(stdout_of(&output).contains("Current time (simulated): 06:30:00 AM"));

    Ok(())
}

#[test]
fn test_date_change_into_dst_gap_moves_forward() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    // 02:30 on 2024-03-10 does not exist in New York; clocks jump to 03:00.
    let input = "date\ny\n03 09 2024\ntime\ny\n02 30 00\ndate\ny\n03 10 2024\ntime\nn\n";

    let output = run_shell_with_env(temp_dir.path(), &[], &[("TZ", "America/New_York")], input)?;

    let text = stdout_of(&output);
    assert!(text.contains("Time updated to: 02:30:00 AM"));
    assert!(text.contains("Date updated to: 03/10/2024"));
    assert!(!text.contains("Invalid date combination"));
    if Path::new("/usr/share/zoneinfo/America/New_York").exists() {
        assert!(text.contains("Current time (simulated): 03:30:00 AM"));
    }
    Ok(())
}

#[test]
fn test_viewing_clock_does_not_create_record() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;

    let output = run_shell(temp_dir.path(), &[], "date\nn\ntime\nn\nexit\n")?;

    assert!(output.status.success());
    assert!(!temp_dir.path().join("simulated_time.dat").exists());
    Ok(())
}

#[test]
fn test_rejected_override_leaves_no_record() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;

    let output = run_shell(temp_dir.path(), &[], "date\ny\n13 01 2020\ndate\ny\n02 30 2024\n")?;

    let text = stdout_of(&output);
    assert!(text.contains("Invalid month (1-12)"));
    assert!(text.contains("Invalid date combination"));
    assert!(!temp_dir.path().join("simulated_time.dat").exists());
    Ok(())
}

#[test]
fn test_dir_lists_real_directory() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("data.bin"), [7u8; 42])?;
    fs::create_dir(temp_dir.path().join("nested"))?;

    let output = run_shell(temp_dir.path(), &[], "dir\n")?;

    let text = stdout_of(&output);
    assert_eq!(text.matches("<DIR>").count(), 1);
    assert!(text.contains("nested"));
    assert!(text.contains("        42 data.bin"));
    assert!(text.contains("1 File(s)    42 bytes"));
    Ok(())
}

#[test]
fn test_cd_failure_keeps_working_directory() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;

    let output = run_shell(temp_dir.path(), &[], "cd nonexistent\nmkdir marker\n")?;

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("cd: "));
    assert!(temp_dir.path().join("marker").is_dir());
    Ok(())
}

#[test]
fn test_cd_parent_alias_moves_up() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let start = temp_dir.path().join("a").join("b");
    fs::create_dir_all(&start)?;

    let output = run_shell(&start, &[], "cd..\ntouch marker.txt\n")?;

    assert!(output.status.success());
    assert!(temp_dir.path().join("a").join("marker.txt").is_file());
    Ok(())
}

#[test]
fn test_file_commands_round_trip() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("hello.txt"), "hello from disk\n")?;

    let input = "type hello.txt\ndel hello.txt\ntype hello.txt\n";
    let output = run_shell(temp_dir.path(), &[], input)?;

    let text = stdout_of(&output);
    assert!(text.contains("hello from disk"));
    assert!(text.contains("File 'hello.txt' deleted"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("type: "));
    assert!(!temp_dir.path().join("hello.txt").exists());
    Ok(())
}

#[test]
fn test_unknown_command_is_not_fatal() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;

    let output = run_shell(temp_dir.path(), &[], "frobnicate\nmkdir after\n")?;

    assert!(output.status.success());
    assert!(stdout_of(&output).contains("Unknown command: frobnicate"));
    assert!(temp_dir.path().join("after").is_dir());
    Ok(())
}

#[test]
fn test_clock_file_is_anchored_at_startup() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    fs::create_dir(temp_dir.path().join("sub"))?;

    let output = run_shell(
        temp_dir.path(),
        &["--clock-file", "custom.dat"],
        "cd sub\ndate\ny\n01 15 2025\n",
    )?;

    assert!(output.status.success());
    assert!(temp_dir.path().join("custom.dat").is_file());
    assert!(!temp_dir.path().join("sub").join("custom.dat").exists());
    assert!(!temp_dir.path().join("simulated_time.dat").exists());
    Ok(())
}
