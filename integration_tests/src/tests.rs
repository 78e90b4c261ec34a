//! Integration test cases.

use std::time::Duration;

use colored::Colorize;

use crate::device::DeviceClient;

/// Test result.
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    pub message: Option<String>,
}

impl TestResult {
    fn pass(name: &str) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            message: None,
        }
    }

    fn fail(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            message: Some(message.to_string()),
        }
    }
}

/// Run a test function and print results as it happens.
fn run_test<F>(name: &str, device: &mut DeviceClient, test_fn: F) -> TestResult
where
    F: FnOnce(&mut DeviceClient) -> TestResult,
{
    print!("  {} ... ", name);
    std::io::Write::flush(&mut std::io::stdout()).ok();

    let mut result = test_fn(device);
    result.name = name.to_string();

    if result.passed {
        println!("{}", "PASS".green().bold());
    } else {
        println!("{}", "FAIL".red().bold());
        if let Some(msg) = &result.message {
            println!("    {}", msg.red());
        }
    }

    result
}

/// Tests for the hello/counter demo.
pub fn run_hello_tests(device: &mut DeviceClient) -> Vec<TestResult> {
    let mut results = Vec::new();

    results.push(run_test("Banner is Hello World!", device, test_hello_banner));
    device.set_timeout(Duration::from_secs(2));
    results.push(run_test("Counter increments by one", device, test_counter_increments));
    results.push(run_test("Counter paces at about 250 ms", device, test_counter_interval));

    results
}

/// Tests for the echo demo.
pub fn run_echo_tests(device: &mut DeviceClient) -> Vec<TestResult> {
    let mut results = Vec::new();

    results.push(run_test("Line is echoed with prefix", device, test_echo_single));
    results.push(run_test("Lines are echoed in order", device, test_echo_order));
    results.push(run_test("CR and LF both end a line", device, test_echo_crlf));
    results.push(run_test("Overlong line is dropped", device, test_echo_overflow));
    results.push(run_test("Split writes form one line", device, test_echo_split));

    results
}

/// Print test results summary.
pub fn print_results(results: &[TestResult]) {
    println!("\n{}", "=".repeat(60));
    println!("{}", "Test Results".bold());
    println!("{}", "=".repeat(60));

    let mut passed = 0;
    let mut failed = 0;

    for result in results {
        if result.passed {
            println!("  {} {}", "[PASS]".green().bold(), result.name);
            passed += 1;
        } else {
            println!("  {} {}", "[FAIL]".red().bold(), result.name);
            if let Some(msg) = &result.message {
                println!("         {}", msg.red());
            }
            failed += 1;
        }
    }

    println!("{}", "-".repeat(60));
    println!(
        "  Total: {} passed, {} failed",
        passed.to_string().green(),
        if failed > 0 {
            failed.to_string().red()
        } else {
            failed.to_string().normal()
        }
    );
    println!("{}", "=".repeat(60));
}

/// Parse a counter line such as " F" or "1A"
fn parse_counter(line: &str) -> Option<u8> {
    u8::from_str_radix(line.trim(), 16).ok()
}

/// Read the next counter value, skipping blank lines
fn next_counter(device: &mut DeviceClient) -> Result<u8, String> {
    let line = device.read_non_empty_line().map_err(|e| format!("Error: {}", e))?;
    parse_counter(&line).ok_or_else(|| format!("Not a counter line: {:?}", line))
}

fn expect_line(device: &mut DeviceClient, expected: &str) -> Result<(), String> {
    match device.read_line() {
        Ok(line) if line == expected => Ok(()),
        Ok(line) => Err(format!("Expected {:?}, got {:?}", expected, line)),
        Err(e) => Err(format!("Error: {}", e)),
    }
}

// --- Hello demo ---

fn test_hello_banner(device: &mut DeviceClient) -> TestResult {
    match device.read_non_empty_line() {
        Ok(line) if line == "Hello World!" => TestResult::pass("test"),
        Ok(line) => TestResult::fail("test", &format!("Unexpected banner {:?}", line)),
        Err(e) => TestResult::fail("test", &format!("Error: {}", e)),
    }
}

fn test_counter_increments(device: &mut DeviceClient) -> TestResult {
    let mut previous = match next_counter(device) {
        Ok(value) => value,
        Err(msg) => return TestResult::fail("test", &msg),
    };

    for _ in 0..5 {
        let value = match next_counter(device) {
            Ok(value) => value,
            Err(msg) => return TestResult::fail("test", &msg),
        };
        if value != previous.wrapping_add(1) {
            return TestResult::fail(
                "test",
                &format!("Expected {:02X} after {:02X}, got {:02X}", previous.wrapping_add(1), previous, value),
            );
        }
        previous = value;
    }

    TestResult::pass("test")
}

fn test_counter_interval(device: &mut DeviceClient) -> TestResult {
    if let Err(msg) = next_counter(device) {
        return TestResult::fail("test", &msg);
    }

    let start = std::time::Instant::now();
    for _ in 0..8 {
        if let Err(msg) = next_counter(device) {
            return TestResult::fail("test", &msg);
        }
    }
    let per_line = start.elapsed() / 8;
    print!("({} ms) ", per_line.as_millis());

    if per_line < Duration::from_millis(200) || per_line > Duration::from_millis(400) {
        return TestResult::fail("test", &format!("Line interval {:?} out of range", per_line));
    }
    TestResult::pass("test")
}

// --- Echo demo ---

fn test_echo_single(device: &mut DeviceClient) -> TestResult {
    if let Err(e) = device.send_line("ping") {
        return TestResult::fail("test", &format!("Error: {}", e));
    }
    match expect_line(device, "> ping") {
        Ok(()) => TestResult::pass("test"),
        Err(msg) => TestResult::fail("test", &msg),
    }
}

fn test_echo_order(device: &mut DeviceClient) -> TestResult {
    for i in 0..5 {
        let text = format!("line {}", i);
        if let Err(e) = device.send_line(&text) {
            return TestResult::fail("test", &format!("Error: {}", e));
        }
        if let Err(msg) = expect_line(device, &format!("> {}", text)) {
            return TestResult::fail("test", &msg);
        }
    }
    TestResult::pass("test")
}

fn test_echo_crlf(device: &mut DeviceClient) -> TestResult {
    // "\r\n" ends "abc" and then an empty line
    if let Err(e) = device.send_raw(b"abc\r\n") {
        return TestResult::fail("test", &format!("Error: {}", e));
    }
    if let Err(msg) = expect_line(device, "> abc") {
        return TestResult::fail("test", &msg);
    }
    match expect_line(device, "> ") {
        Ok(()) => TestResult::pass("test"),
        Err(msg) => TestResult::fail("test", &msg),
    }
}

fn test_echo_overflow(device: &mut DeviceClient) -> TestResult {
    let long = "x".repeat(100);
    if let Err(e) = device.send_line(&long) {
        return TestResult::fail("test", &format!("Error: {}", e));
    }
    if let Err(e) = device.send_line("after") {
        return TestResult::fail("test", &format!("Error: {}", e));
    }
    match expect_line(device, "> after") {
        Ok(()) => TestResult::pass("test"),
        Err(msg) => TestResult::fail("test", &msg),
    }
}

fn test_echo_split(device: &mut DeviceClient) -> TestResult {
    let parts: [&[u8]; 3] = [b"sp", b"li", b"t\n"];
    for part in parts {
        if let Err(e) = device.send_raw(part) {
            return TestResult::fail("test", &format!("Error: {}", e));
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    match expect_line(device, "> split") {
        Ok(()) => TestResult::pass("test"),
        Err(msg) => TestResult::fail("test", &msg),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_counter() {
        assert_eq!(parse_counter(" 0"), Some(0));
        assert_eq!(parse_counter(" F"), Some(0x0F));
        assert_eq!(parse_counter("FF"), Some(0xFF));
        assert_eq!(parse_counter("Hello"), None);
    }
}
