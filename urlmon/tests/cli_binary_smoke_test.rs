use std::process::Command;

fn bin_path() -> &'static str {
    env!("CARGO_BIN_EXE_urlmon")
}

#[test]
fn help_lists_endpoints() {
    let output = Command::new(bin_path())
        .arg("--help")
        .output()
        .expect("failed to run urlmon --help");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--urls"), "unexpected help: {stdout}");
    assert!(stdout.contains("/metrics"), "unexpected help: {stdout}");
}

#[test]
fn missing_urls_is_rejected() {
    let output = Command::new(bin_path())
        .env_remove("URLMON_URLS")
        .output()
        .expect("failed to run urlmon");

    assert!(
        !output.status.success(),
        "urlmon should fail without --urls"
    );
}

#[test]
fn invalid_check_period_is_rejected() {
    let output = Command::new(bin_path())
        .args(["--urls", "http://a.example", "--check-period", "soon"])
        .output()
        .expect("failed to run urlmon");

    assert!(!output.status.success());
}
