use super::*;
use crate::args::parsers::parse_bool_env;
use crate::error::ValidationError;
use clap::Parser;
use std::time::Duration;

#[test]
fn defaults_match_the_reference_scenario() -> Result<(), String> {
    let args = LoadArgs::try_parse_from(["stochast", "-u", "http://localhost"])
        .map_err(|err| format!("Expected parse success: {}", err))?;

    if args.users.get() != 50 {
        return Err(format!("Unexpected users {}", args.users.get()));
    }
    if args.duration != Duration::from_secs(60) {
        return Err(format!("Unexpected duration {:?}", args.duration));
    }
    if args.sleep_min != 1 || args.sleep_max != 5 || args.sleep_unit != Duration::from_secs(1) {
        return Err("Unexpected sleep defaults".to_owned());
    }
    if args.grace != Duration::from_secs(5) || args.seed.is_some() {
        return Err("Unexpected grace or seed defaults".to_owned());
    }
    if args.method != HttpMethod::Get || args.status != 200 {
        return Err("Unexpected request defaults".to_owned());
    }
    if args.output_format != OutputFormat::Text || args.output.is_some() {
        return Err("Unexpected output defaults".to_owned());
    }
    Ok(())
}

#[test]
fn parses_run_options() -> Result<(), String> {
    let args = LoadArgs::try_parse_from([
        "stochast",
        "-u",
        "http://localhost/items?id={{rand:1-1000}}",
        "-c",
        "12",
        "-t",
        "90s",
        "--probability",
        "0.25",
        "--sleep-min",
        "0",
        "--sleep-max",
        "3",
        "--sleep-unit",
        "250ms",
        "--grace",
        "0s",
        "--seed",
        "7",
        "-X",
        "POST",
        "--output-format",
        "json",
    ])
    .map_err(|err| format!("Expected parse success: {}", err))?;

    if args.users.get() != 12 || args.duration != Duration::from_secs(90) {
        return Err("Unexpected users or duration".to_owned());
    }
    if args.sleep_min != 0 || args.sleep_max != 3 {
        return Err("Unexpected sleep range".to_owned());
    }
    if args.sleep_unit != Duration::from_millis(250) || args.grace != Duration::ZERO {
        return Err("Unexpected sleep unit or grace".to_owned());
    }
    if args.seed != Some(7) || args.method != HttpMethod::Post {
        return Err("Unexpected seed or method".to_owned());
    }
    if args.output_format != OutputFormat::Json {
        return Err("Unexpected output format".to_owned());
    }
    if args.probability.to_string() != "0.25" {
        return Err(format!("Unexpected probability {}", args.probability));
    }
    Ok(())
}

#[test]
fn rejects_zero_users() -> Result<(), String> {
    match LoadArgs::try_parse_from(["stochast", "-u", "http://localhost", "-c", "0"]) {
        Ok(_) => Err("Expected zero users to be rejected".to_owned()),
        Err(_) => Ok(()),
    }
}

#[test]
fn rejects_zero_duration_but_allows_zero_grace() -> Result<(), String> {
    if LoadArgs::try_parse_from(["stochast", "-u", "http://localhost", "-t", "0s"]).is_ok() {
        return Err("Expected zero duration to be rejected".to_owned());
    }
    match parse_grace_value("0") {
        Ok(duration) if duration.is_zero() => Ok(()),
        other => Err(format!("Expected zero grace, got {:?}", other)),
    }
}

#[test]
fn rejects_non_numeric_probability() -> Result<(), String> {
    match LoadArgs::try_parse_from(["stochast", "-u", "http://localhost", "-p", "often"]) {
        Ok(_) => Err("Expected probability parse failure".to_owned()),
        Err(_) => Ok(()),
    }
}

#[test]
fn parses_repeated_headers() -> Result<(), String> {
    let args = LoadArgs::try_parse_from([
        "stochast",
        "-u",
        "http://localhost",
        "-H",
        "X-User: {{user}}",
        "-H",
        "Accept:application/json",
    ])
    .map_err(|err| format!("Expected parse success: {}", err))?;

    let expected = vec![
        ("X-User".to_owned(), "{{user}}".to_owned()),
        ("Accept".to_owned(), "application/json".to_owned()),
    ];
    if args.headers != expected {
        return Err(format!("Unexpected headers {:?}", args.headers));
    }
    Ok(())
}

#[test]
fn header_without_colon_is_rejected() -> Result<(), String> {
    match parse_header("no-colon-here") {
        Err(ValidationError::InvalidHeaderFormat { value }) if value == "no-colon-here" => Ok(()),
        other => Err(format!("Expected InvalidHeaderFormat, got {:?}", other)),
    }
}

#[test]
fn duration_units() -> Result<(), String> {
    let cases = [
        ("750ms", Duration::from_millis(750)),
        ("3", Duration::from_secs(3)),
        ("3s", Duration::from_secs(3)),
        ("2m", Duration::from_secs(120)),
        ("1h", Duration::from_secs(3_600)),
    ];
    for (input, expected) in cases {
        let parsed =
            parse_duration_value(input).map_err(|err| format!("{} failed: {}", input, err))?;
        if parsed != expected {
            return Err(format!("{} parsed to {:?}", input, parsed));
        }
    }
    Ok(())
}

#[test]
fn duration_errors() -> Result<(), String> {
    let cases = ["", "ms", "10d", "0ms", "99999999999999999999h"];
    for input in cases {
        if parse_duration_value(input).is_ok() {
            return Err(format!("Expected '{}' to be rejected", input));
        }
    }
    Ok(())
}

#[test]
fn bool_env_values() -> Result<(), String> {
    for value in ["1", "true", "YES", "on"] {
        if !matches!(parse_bool_env(value), Ok(true)) {
            return Err(format!("Expected '{}' to be true", value));
        }
    }
    for value in ["0", "false", "No", "off"] {
        if !matches!(parse_bool_env(value), Ok(false)) {
            return Err(format!("Expected '{}' to be false", value));
        }
    }
    if parse_bool_env("maybe").is_ok() {
        return Err("Expected 'maybe' to be rejected".to_owned());
    }
    Ok(())
}
