use clap::Parser;

use latency_plot::cli::{parse_params, run, Args};
use latency_plot::config::{ExpectedFields, RenderConfig};
use latency_plot::error::PlotError;

fn tokens(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|t| t.to_string()).collect()
}

#[test]
fn cli_collects_free_form_params_with_default_dirs() {
    let args = Args::parse_from(["latency-plot", "nome=demo", "p=90", "clip=true"]);
    assert_eq!(args.params, tokens(&["nome=demo", "p=90", "clip=true"]));
    assert_eq!(args.data_dir, std::path::PathBuf::from("."));
    assert_eq!(args.plots_dir, std::path::PathBuf::from("plots"));
}

#[test]
fn parse_params_skips_tokens_without_exactly_one_separator() {
    let params = parse_params(&tokens(&["nome=demo", "loose", "a=b=c", "=x", "p=90", "p=95"]));
    assert_eq!(params.len(), 2);
    assert_eq!(params["nome"], "demo");
    assert_eq!(params["p"], "95");
}

#[test]
fn config_defaults_when_only_name_is_given() {
    let config = RenderConfig::from_params(&parse_params(&tokens(&["nome=demo"])))
        .expect("config should parse");
    assert_eq!(config, RenderConfig::new("demo"));
    assert_eq!(config.percentile, 100);
    assert!(!config.clip);
    assert_eq!(config.y_min, 0.0);
    assert_eq!(config.y_max, None);
}

#[test]
fn config_parses_typed_fields_and_keeps_unknown_keys() {
    let params = parse_params(&tokens(&[
        "nome=run1",
        "p=99",
        "clip=Yes",
        "ymin=10",
        "ymax=2500.5",
        "color=red",
    ]));
    let config = RenderConfig::from_params(&params).expect("config should parse");

    assert_eq!(config.dataset, "run1");
    assert_eq!(config.percentile, 99);
    assert!(config.clip);
    assert_eq!(config.y_min, 10.0);
    assert_eq!(config.y_max, Some(2500.5));
    assert_eq!(config.extra.get("color").map(String::as_str), Some("red"));
}

#[test]
fn malformed_invocations_are_usage_errors() {
    let cases = [
        (vec!["p=90"], "nome"),
        (vec!["nome="], "nome"),
        (vec!["nome=demo", "p=101"], "'p'"),
        (vec!["nome=demo", "p=ninety"], "'p'"),
        (vec!["nome=demo", "clip=maybe"], "'clip'"),
        (vec!["nome=demo", "ymax=lots"], "'ymax'"),
        (vec!["nome=demo", "ymin=5", "ymax=5"], "ymax"),
    ];
    for (raw, needle) in cases {
        let err = RenderConfig::from_params(&parse_params(&tokens(&raw)))
            .expect_err("invocation should be rejected");
        assert!(matches!(err, PlotError::InvalidArgument(_)), "{raw:?}: {err}");
        assert!(err.is_usage());
        assert!(
            err.to_string().contains(needle),
            "unexpected error for {raw:?}: {err}"
        );
    }
}

#[test]
fn clip_accepts_explicit_falsy_tokens() {
    for token in ["false", "0", "no", "OFF"] {
        let clip = format!("clip={token}");
        let params = parse_params(&tokens(&["nome=demo", clip.as_str()]));
        let config = RenderConfig::from_params(&params).expect("config should parse");
        assert!(!config.clip, "clip={token} should be false");
    }
}

#[test]
fn output_path_encodes_name_percentile_and_clip_mode() {
    let mut config = RenderConfig::new("demo");
    let dir = std::path::Path::new("plots");
    assert_eq!(
        config.output_path(dir),
        dir.join("graph_demo_100_noclip.png")
    );

    config.percentile = 90;
    config.clip = true;
    assert_eq!(
        config.output_path(dir),
        dir.join("graph_demo_90_clipped.png")
    );
}

#[test]
fn usage_line_lists_expected_fields_with_defaults() {
    let line = ExpectedFields::default().usage_line().expect("usage");
    assert_eq!(
        line,
        r#"expected fields {"nome":null,"p":100,"clip":false,"ymax":null}"#
    );
}

fn scratch_args(tmp: &tempfile::TempDir, params: &[&str]) -> Args {
    Args {
        data_dir: tmp.path().join("data"),
        plots_dir: tmp.path().join("plots"),
        params: tokens(params),
    }
}

#[test]
fn run_without_params_prints_usage_and_touches_nothing() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let args = scratch_args(&tmp, &[]);
    let plots_dir = args.plots_dir.clone();

    run(args).expect("no-argument invocation should succeed");
    assert!(!plots_dir.exists(), "no output should be produced");
    assert!(!tmp.path().join("data").exists());
}

#[test]
fn run_reports_malformed_percentile_without_failing() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let args = scratch_args(&tmp, &["nome=demo", "p=abc"]);
    let plots_dir = args.plots_dir.clone();

    run(args).expect("usage errors end normally");
    assert!(!plots_dir.exists(), "no output should be produced");
}

#[test]
fn run_with_missing_dataset_ends_normally() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let args = scratch_args(&tmp, &["nome=absent"]);
    let plots_dir = args.plots_dir.clone();

    run(args).expect("missing input ends normally");
    assert!(!plots_dir.exists(), "no output should be produced");
}
