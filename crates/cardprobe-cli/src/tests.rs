use std::time::Duration;

use cardprobe_core::BatchPolicy;
use clap::Parser;

use super::*;
use crate::commands::batch_policy;

#[test]
fn parses_resolve_command() {
    let cli = Cli::try_parse_from(["cardprobe", "resolve", "18671335"])
        .expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Resolve { ref id } if id == "18671335"));
}

#[test]
fn parses_batch_with_overrides() {
    let cli = Cli::try_parse_from([
        "cardprobe",
        "batch",
        "111",
        "222",
        "333",
        "--max-batch",
        "5",
        "--no-pacing",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Commands::Batch {
            ids,
            max_batch,
            no_pacing,
        } => {
            assert_eq!(ids, vec!["111", "222", "333"]);
            assert_eq!(max_batch, Some(5));
            assert!(no_pacing);
        }
        other => panic!("expected Batch, got: {other:?}"),
    }
}

#[test]
fn batch_defaults_keep_configured_policy() {
    let cli = Cli::try_parse_from(["cardprobe", "batch", "111"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Batch {
            max_batch: None,
            no_pacing: false,
            ..
        }
    ));
}

#[test]
fn parses_addresses_command() {
    let cli = Cli::try_parse_from(["cardprobe", "addresses", "123456"])
        .expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Addresses { ref id } if id == "123456"));
}

#[test]
fn missing_subcommand_is_rejected() {
    assert!(Cli::try_parse_from(["cardprobe"]).is_err());
}

#[test]
fn resolve_requires_an_id() {
    assert!(Cli::try_parse_from(["cardprobe", "resolve"]).is_err());
}

#[test]
fn no_pacing_zeroes_delay_and_jitter() {
    let policy = batch_policy(BatchPolicy::default(), None, true).expect("valid overrides");
    assert_eq!(policy.pacing_delay, Duration::ZERO);
    assert_eq!(policy.pacing_jitter, Duration::ZERO);
    assert_eq!(policy.max_batch, 10);
}

#[test]
fn max_batch_override_applies() {
    let policy = batch_policy(BatchPolicy::default(), Some(25), false).expect("valid overrides");
    assert_eq!(policy.max_batch, 25);
    assert_eq!(policy.pacing_delay, Duration::from_millis(2_000));
}

#[test]
fn zero_max_batch_is_rejected() {
    assert!(batch_policy(BatchPolicy::default(), Some(0), false).is_err());
}
