//! CLI integration tests.
//!
//! Tests cover:
//! - Config loading from INI files on disk
//! - Date range and ticker selection from arguments
//! - Port selection from configuration
//! - Full `report` runs in demo mode and the empty-selection exit code

mod common;

use clap::Parser;
use common::*;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use stockbrief::adapters::file_config_adapter::FileConfigAdapter;
use stockbrief::cli::{self, Cli};
use stockbrief::domain::error::StockbriefError;
use stockbrief::ports::config_port::ConfigPort;
use stockbrief::ports::report_port::ReportPort;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

// ExitCode has no PartialEq on older toolchains; compare the Debug form.
fn same_code(actual: ExitCode, expected: u8) -> bool {
    format!("{actual:?}") == format!("{:?}", ExitCode::from(expected))
}

fn run(args: &[&str]) -> ExitCode {
    let mut argv = vec!["stockbrief"];
    argv.extend_from_slice(args);
    cli::run(Cli::parse_from(argv))
}

mod config_loading {
    use super::*;

    #[test]
    fn loads_ini_from_disk() {
        let file = write_temp_ini(
            "[stockbrief_test]\nendpoint = http://localhost:9999\n\n[logging]\nformat = text\n",
        );
        let config = cli::load_config(Some(&file.path().to_path_buf())).unwrap();
        assert_eq!(
            config.get_string("stockbrief_test", "endpoint").as_deref(),
            Some("http://localhost:9999")
        );
    }

    #[test]
    fn missing_file_is_parse_error() {
        let path = PathBuf::from("/nonexistent/stockbrief.ini");
        let err = cli::load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, StockbriefError::ConfigParse { file, .. } if file.contains("stockbrief.ini")));
    }

    #[test]
    fn no_path_gives_empty_file_layer() {
        let config = cli::load_config(None).unwrap();
        assert!(config.get_string("stockbrief_test", "endpoint").is_none());
    }
}

mod arguments {
    use super::*;

    #[test]
    fn default_range_is_trailing_window() {
        let range = cli::build_date_range(None, None, date("2024-03-31")).unwrap();
        assert_eq!(range, test_range());
    }

    #[test]
    fn explicit_bounds_override_defaults() {
        let range =
            cli::build_date_range(Some("2024-01-02"), Some("2024-01-31"), date("2024-03-31")).unwrap();
        assert_eq!(range.to_string(), "2024-01-02 to 2024-01-31");

        let range = cli::build_date_range(Some("2024-03-10"), None, date("2024-03-31")).unwrap();
        assert_eq!(range.start, date("2024-03-10"));
        assert_eq!(range.end, date("2024-03-30"));
    }

    #[test]
    fn bad_or_reversed_dates_are_rejected() {
        let err = cli::build_date_range(Some("03/01/2024"), None, date("2024-03-31")).unwrap_err();
        assert!(matches!(err, StockbriefError::ConfigInvalid { key, .. } if key == "start"));

        let err =
            cli::build_date_range(Some("2024-03-20"), Some("2024-03-10"), date("2024-03-31")).unwrap_err();
        assert!(matches!(err, StockbriefError::ConfigInvalid { .. }));
    }

    #[test]
    fn ticker_set_splits_and_normalizes() {
        let args = vec!["aapl,tsla".to_string(), " nvda ".to_string()];
        let (set, ignored) = cli::build_ticker_set(&args);
        let symbols: Vec<&str> = set.iter().map(|t| t.as_str()).collect();
        assert_eq!(symbols, vec!["AAPL", "TSLA", "NVDA"]);
        assert!(ignored.is_empty());
    }

    #[test]
    fn ticker_set_reports_overflow_but_not_duplicates() {
        let args: Vec<String> = ["AAPL", "aapl", "TSLA", "NVDA", "MSFT"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let (set, ignored) = cli::build_ticker_set(&args);
        assert_eq!(set.len(), TickerSet::CAPACITY);
        assert_eq!(ignored, vec!["MSFT"]);
    }

    #[test]
    fn sample_set_keeps_known_samples_and_reports_others() {
        let args = vec!["tsla, msft".to_string(), "TSLA".to_string()];
        let (set, unknown) = cli::build_sample_set(&args);
        let symbols: Vec<&str> = set.iter().map(|t| t.as_str()).collect();
        assert_eq!(symbols, vec!["TSLA"]);
        assert_eq!(unknown, vec!["msft"]);
    }

    #[test]
    fn sample_set_defaults_to_all_samples() {
        let (set, unknown) = cli::build_sample_set(&[]);
        let symbols: Vec<&str> = set.iter().map(|t| t.as_str()).collect();
        assert_eq!(symbols, vec!["AAPL", "TSLA", "NVDA"]);
        assert!(unknown.is_empty());
    }

    #[test]
    fn writer_follows_extension() {
        let report = stockbrief::domain::report::Report::new(
            test_range(),
            stockbrief::domain::report::GenerationMode::Demo,
            Vec::new(),
        );
        let html = cli::writer_for(Path::new("out.HTML")).render(&report).unwrap();
        assert!(html.contains("<html"));
        let json = cli::writer_for(Path::new("out.json")).render(&report).unwrap();
        assert!(json.trim_start().starts_with('{'));
        let text = cli::writer_for(Path::new("out.txt")).render(&report).unwrap();
        assert!(text.starts_with("AI Stock Report"));
    }
}

mod port_selection {
    use super::*;

    #[test]
    fn backend_url_needs_no_api_keys() {
        let config = FileConfigAdapter::from_string("[backend]\nbase_url = http://127.0.0.1:3000\n").unwrap();
        assert!(cli::build_ports(&config, None).is_ok());
    }

    #[test]
    fn direct_mode_requires_both_keys() {
        let config = FileConfigAdapter::from_string("[anthropic]\napi_key = sk-test\n").unwrap();
        let err = cli::build_ports(&config, None).err().unwrap();
        assert!(matches!(err, StockbriefError::ConfigMissing { section, key } if section == "polygon" && key == "api_key"));
    }

    #[test]
    fn data_dir_replaces_price_key() {
        let dir = tempfile::tempdir().unwrap();
        let config = FileConfigAdapter::from_string("[anthropic]\napi_key = sk-test\n").unwrap();
        assert!(cli::build_ports(&config, Some(dir.path())).is_ok());
    }

    #[test]
    fn invalid_timeout_is_rejected() {
        let config = FileConfigAdapter::from_string(
            "[backend]\nbase_url = http://127.0.0.1:3000\n\n[http]\ntimeout_secs = 0\n",
        )
        .unwrap();
        let err = cli::build_ports(&config, None).err().unwrap();
        assert!(matches!(err, StockbriefError::ConfigInvalid { .. }));
    }
}

mod report_command {
    use super::*;

    #[test]
    fn demo_report_writes_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.json");
        let code = run(&["report", "--demo", "-o", path.to_str().unwrap()]);
        assert!(same_code(code, 0));

        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        let tickers: Vec<&str> = value["entries"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["ticker"].as_str().unwrap())
            .collect();
        assert_eq!(tickers, vec!["AAPL", "TSLA", "NVDA"]);
        assert_eq!(value["mode"], "demo");
    }

    #[test]
    fn demo_report_keeps_requested_ticker() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        let code = run(&["report", "--demo", "msft", "-o", path.to_str().unwrap()]);
        assert!(same_code(code, 0));

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("MSFT Analysis"));
        assert!(!content.contains("AAPL Analysis"));
    }

    #[test]
    fn live_report_without_tickers_exits_with_selection_code() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("AAPL.csv"), "date,open,high,low,close,volume\n").unwrap();
        let code = run(&["report", "--data-dir", dir.path().to_str().unwrap()]);
        assert!(same_code(code, 4));
    }

    #[test]
    fn missing_config_file_exits_with_config_code() {
        let code = run(&["report", "--demo", "--config", "/nonexistent/stockbrief.ini"]);
        assert!(same_code(code, 2));
    }

    #[test]
    fn bad_date_exits_with_config_code() {
        let code = run(&["report", "--demo", "--start", "yesterday"]);
        assert!(same_code(code, 2));
    }

    #[test]
    fn samples_command_succeeds() {
        assert!(same_code(run(&["samples"]), 0));
        assert!(same_code(run(&["samples", "nvda", "xyz"]), 0));
    }
}
