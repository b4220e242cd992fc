use std::{error::Error as _, fmt, time::Duration};

use flagbind::{
    Convertible, Error, Kind, Record, Registry, Settings, UnknownVariant, ValueError,
    help::{Help, usage},
    try_parse,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

/// Deploy a build to some servers.
///
/// Servers are contacted in the order given.
#[derive(Record, Debug, Default)]
#[allow(non_snake_case)]
struct Deploy {
    /// Print each step as it happens
    #[flagbind(alias = "v")]
    verbose: bool,

    #[flagbind(alias = "d")]
    dry_run: bool,

    /// Which environment to deploy to
    #[flagbind(alias = "e", placeholder = "ENV")]
    environment: String,

    temperature: i32,
    retries: u8,
    ratio: f64,

    /// Servers to deploy to; may be given more than once
    #[flagbind(alias = "s")]
    server: Vec<String>,

    DummyArG: String,
}

fn deploy(tokens: &[&str]) -> Result<(Deploy, Vec<String>), Error> {
    let mut record = Deploy::default();
    let rest = try_parse(tokens, &mut record, &Settings::new("deploy"))?
        .into_iter()
        .map(String::from)
        .collect();

    Ok((record, rest))
}

#[test]
fn binds_flags_and_values() {
    let (record, rest) = deploy(&[
        "-v",
        "--environment",
        "staging",
        "--retries=3",
        "--ratio",
        "0.5",
        "release-1",
        "--dry-run",
    ])
    .expect("tokens bind");

    assert!(record.verbose);
    assert!(!record.dry_run);
    assert_eq!(record.environment, "staging");
    assert_eq!(record.retries, 3);
    assert_eq!(record.ratio, 0.5);
    assert_eq!(rest, ["release-1", "--dry-run"]);
}

#[rstest]
#[case::primary("--dummy-arg")]
#[case::upper("--DUMMY-ARG")]
#[case::mixed("--Dummy-Arg")]
fn multi_word_names(#[case] flag: &str) {
    let (record, _) = deploy(&[flag, "value"]).expect("tokens bind");
    assert_eq!(record.DummyArG, "value");
}

#[test]
fn snake_case_is_dashed() {
    let (record, _) = deploy(&["--DRY-RUN"]).expect("tokens bind");
    assert!(record.dry_run);
}

#[test]
fn keep_going_past_positionals() {
    let mut record = Deploy::default();
    let settings = Settings::new("deploy").with_stop_on_positional(false);
    let rest = try_parse(
        &["first", "-v", "second", "--retries", "2", "third"],
        &mut record,
        &settings,
    )
    .expect("tokens bind");

    assert_eq!(rest, ["first", "second", "third"]);
    assert!(record.verbose);
    assert_eq!(record.retries, 2);
}

#[test]
fn sequences_keep_order() {
    let (record, _) =
        deploy(&["-s", "alpha", "--server=beta", "--SERVER", "gamma"]).expect("tokens bind");
    assert_eq!(record.server, ["alpha", "beta", "gamma"]);
}

#[test]
fn sequences_start_empty() {
    let mut record = Deploy {
        server: vec!["stale".to_owned()],
        ..Deploy::default()
    };

    try_parse(&["--server", "fresh"], &mut record, &Settings::new("deploy"))
        .expect("tokens bind");

    assert_eq!(record.server, ["fresh"]);
}

#[test]
fn clustered_booleans() {
    let (record, rest) = deploy(&["-vd", "target"]).expect("tokens bind");
    assert!(record.verbose);
    assert!(record.dry_run);
    assert_eq!(rest, ["target"]);
}

#[test]
fn negative_value_is_taken_verbatim() {
    let (record, rest) = deploy(&["--temperature", "-10", "27"]).expect("tokens bind");
    assert_eq!(record.temperature, -10);
    assert_eq!(rest, ["27"]);
}

#[rstest]
#[case::at_end(&["--environment"], "environment")]
#[case::empty_inline(&["--environment="], "environment")]
#[case::alias(&["-e"], "e")]
fn missing_values(#[case] tokens: &[&str], #[case] expected: &str) {
    match deploy(tokens) {
        Err(Error::MissingValue { flag }) => assert_eq!(flag, expected),
        other => panic!("expected a missing value, got {other:?}"),
    }
}

#[test]
fn unknown_flag() {
    let err = deploy(&["--unknown"]).unwrap_err();
    assert_eq!(err.to_string(), "unrecognized option --unknown");
}

#[test]
fn invalid_number() {
    match deploy(&["--temperature", "warm"]) {
        Err(Error::InvalidValue { flag, value, kind }) => {
            assert_eq!(flag, "temperature");
            assert_eq!(value, "warm");
            assert_eq!(kind, Kind::Int);
        }
        other => panic!("expected an invalid value, got {other:?}"),
    }
}

#[test]
fn overflow_is_rejected() {
    match deploy(&["--retries", "300"]) {
        Err(Error::InvalidValue { kind, .. }) => assert_eq!(kind, Kind::Uint),
        other => panic!("expected an invalid value, got {other:?}"),
    }
}

#[rstest]
#[case::short("-h")]
#[case::long("--help")]
#[case::upper("--HELP")]
fn help_is_requested(#[case] flag: &str) {
    let err = deploy(&["-v", flag]).unwrap_err();
    assert!(err.is_help_request());
}

#[test]
fn binding_is_repeatable() {
    let tokens = ["-v", "--server", "a", "--retries", "4", "rest"];

    let mut first = Deploy::default();
    let mut second = Deploy::default();
    let settings = Settings::new("deploy");

    let first_rest = try_parse(&tokens, &mut first, &settings).expect("tokens bind");
    let second_rest = try_parse(&tokens, &mut second, &settings).expect("tokens bind");

    assert_eq!(first_rest, second_rest);
    assert_eq!(format!("{first:?}"), format!("{second:?}"));
}

#[test]
fn description_comes_from_docs() {
    assert_eq!(
        Deploy::DESCRIPTION,
        "Deploy a build to some servers.\nServers are contacted in the order given."
    );
}

#[test]
fn slots_follow_declaration() {
    let mut record = Deploy::default();
    let registry = Registry::build(&mut record).expect("registry builds");

    let names: Vec<&str> = registry.slots().iter().map(|slot| slot.primary_name()).collect();
    assert_eq!(
        names,
        [
            "verbose",
            "dry-run",
            "environment",
            "temperature",
            "retries",
            "ratio",
            "server",
            "dummy-arg",
        ]
    );

    let environment = registry.lookup("e").expect("alias is registered");
    assert_eq!(environment.help(), Some("Which environment to deploy to"));
    assert_eq!(environment.placeholder(), "ENV");
    assert_eq!(registry.lookup("retries").and_then(|slot| slot.help()), None);
}

#[test]
fn usage_line() {
    let mut record = Deploy::default();
    let registry = Registry::build(&mut record).expect("registry builds");

    assert_eq!(
        usage("deploy", &registry).to_string(),
        "Usage: deploy [-h] [-v] [-d] [-e ENV] [--temperature TEMPERATURE] \
         [--retries RETRIES] [--ratio RATIO] [-s SERVER]... [--dummy-arg DUMMY_ARG] ARGS..."
    );
}

#[test]
fn help_message_includes_description() {
    let mut record = Deploy::default();
    let settings = Settings::for_record::<Deploy>("deploy");
    let registry = Registry::build(&mut record).expect("registry builds");

    let help = Help {
        settings: &settings,
        registry: &registry,
    }
    .to_string();

    assert!(help.starts_with("Usage: deploy [-h] [-v]"));
    assert!(help.contains("\n\nDeploy a build to some servers.\n"));
    assert!(help.contains("Print each step as it happens"));
}

#[derive(Record, Default)]
struct Conflicted {
    #[flagbind(alias = "version")]
    verbose: bool,
    version: bool,
}

#[test]
fn duplicate_alias() {
    let mut record = Conflicted::default();

    match Registry::build(&mut record) {
        Err(Error::DuplicateName { name }) => assert_eq!(name, "version"),
        Err(err) => panic!("expected a duplicate name, got {err:?}"),
        Ok(_) => panic!("expected a duplicate name"),
    }
}

#[derive(Record, Default)]
struct Timed {
    verbose: bool,
    timeout: Duration,
}

#[test]
fn unsupported_field_type() {
    let mut record = Timed::default();

    match try_parse(&["--verbose"], &mut record, &Settings::new("timed")) {
        Err(Error::UnsupportedType { field, type_name }) => {
            assert_eq!(field, "timeout");
            assert!(type_name.ends_with("Duration"), "{type_name}");
        }
        other => panic!("expected an unsupported type, got {other:?}"),
    }

    assert!(!record.verbose);
}

#[derive(Record, Default)]
struct Nested {
    matrix: Vec<Vec<String>>,
}

#[test]
fn unsupported_element_type() {
    let mut record = Nested::default();

    match Registry::build(&mut record) {
        Err(Error::UnsupportedElementType { field, .. }) => assert_eq!(field, "matrix"),
        Err(err) => panic!("expected an unsupported element, got {err:?}"),
        Ok(_) => panic!("expected an unsupported element"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Date {
    year: u16,
    month: u8,
    day: u8,
}

#[derive(Debug, thiserror::Error)]
#[error("dates look like YYYY-MM-DD")]
struct DateError;

impl Convertible for Date {
    type Err = DateError;

    fn parse_from_string(text: &str) -> Result<Self, Self::Err> {
        let mut parts = text.splitn(3, '-');
        let mut part = || parts.next().ok_or(DateError);

        let year = part()?.parse().map_err(|_| DateError)?;
        let month = part()?.parse().map_err(|_| DateError)?;
        let day = part()?.parse().map_err(|_| DateError)?;

        Ok(Date { year, month, day })
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

#[derive(Convertible, Debug, Default, Clone, Copy, PartialEq, Eq)]
enum Level {
    Quiet,
    #[default]
    Normal,
    VeryLoud,
}

#[derive(Convertible, Debug, Default, Clone, PartialEq, Eq)]
enum Target {
    #[default]
    Local,
    Remote(String),
}

#[derive(Convertible, Debug, Clone, Copy, PartialEq, Eq)]
struct Port(u16);

#[derive(Record)]
struct Dated {
    since: Date,
    dates: Vec<Date>,
}

#[test]
fn convertible_fields() {
    let mut record = Dated {
        since: Date {
            year: 1970,
            month: 1,
            day: 1,
        },
        dates: Vec::new(),
    };

    try_parse(
        &["--since", "2024-02-29", "--dates", "2024-01-01", "--dates=2024-12-31"],
        &mut record,
        &Settings::new("dated"),
    )
    .expect("tokens bind");

    assert_eq!(record.since.to_string(), "2024-02-29");
    let dates: Vec<String> = record.dates.iter().map(Date::to_string).collect();
    assert_eq!(dates, ["2024-01-01", "2024-12-31"]);
}

#[test]
fn conversion_errors_keep_their_source() {
    let mut record = Dated {
        since: Date {
            year: 1970,
            month: 1,
            day: 1,
        },
        dates: Vec::new(),
    };

    let err = try_parse(&["--since", "yesterday"], &mut record, &Settings::new("dated"))
        .unwrap_err();

    assert!(matches!(err, Error::Conversion { ref flag, ref value, .. }
        if flag == "since" && value == "yesterday"));

    let source = err.source().expect("conversion has a source");
    assert!(source.downcast_ref::<DateError>().is_some());
}

type Stamps = Vec<Duration>;

#[derive(Record, Default)]
struct Aliased {
    stamps: Stamps,
}

// The derive only sees the alias, not the `Vec` behind it, so the whole type
// is reported rather than its element.
#[test]
fn aliased_sequence_is_an_unsupported_type() {
    let mut record = Aliased::default();

    match Registry::build(&mut record) {
        Err(Error::UnsupportedType { field, type_name }) => {
            assert_eq!(field, "stamps");
            assert!(type_name.contains("Vec"), "{type_name}");
        }
        Err(err) => panic!("expected an unsupported type, got {err:?}"),
        Ok(_) => panic!("expected an unsupported type"),
    }
}

#[derive(Record, Default)]
struct Optional {
    since: Option<Date>,
}

#[test]
fn optional_fields_are_unsupported() {
    let mut record = Optional::default();

    assert!(matches!(
        try_parse(&["--since", "2024-01-01"], &mut record, &Settings::new("optional")),
        Err(Error::UnsupportedType { ref field, .. }) if field == "since"
    ));
}

#[derive(Record, Default, Debug)]
struct Tuned {
    level: Level,
    target: Target,
    port: Port,
}

impl Default for Port {
    fn default() -> Self {
        Port(80)
    }
}

fn tuned(tokens: &[&str]) -> Result<Tuned, Error> {
    let mut record = Tuned::default();
    try_parse(tokens, &mut record, &Settings::new("tuned"))?;
    Ok(record)
}

#[rstest]
#[case::quiet("quiet", Level::Quiet)]
#[case::kebab("very-loud", Level::VeryLoud)]
#[case::shouting("VERY-LOUD", Level::VeryLoud)]
fn derived_enum(#[case] text: &str, #[case] expected: Level) {
    let record = tuned(&["--level", text]).expect("tokens bind");
    assert_eq!(record.level, expected);
}

#[test]
fn derived_enum_rejects_unknown() {
    let err = tuned(&["--level", "loud"]).unwrap_err();
    let source = err.source().expect("conversion has a source");

    assert_eq!(
        source.downcast_ref::<UnknownVariant>(),
        Some(&UnknownVariant::new("loud", &["quiet", "normal", "very-loud"]))
    );
}

#[test]
fn derived_enum_fallback() {
    let record = tuned(&["--target", "LOCAL"]).expect("tokens bind");
    assert_eq!(record.target, Target::Local);

    let record = tuned(&["--target", "db.example.com"]).expect("tokens bind");
    assert_eq!(record.target, Target::Remote("db.example.com".to_owned()));
}

#[test]
fn derived_newtype() {
    let record = tuned(&["--port", "8080"]).expect("tokens bind");
    assert_eq!(record.port, Port(8080));

    let err = tuned(&["--port", "80000"]).unwrap_err();
    let source = err.source().expect("conversion has a source");
    assert!(matches!(
        source.downcast_ref::<ValueError>(),
        Some(ValueError::Invalid(Kind::Uint))
    ));
}

#[test]
fn derived_defaults_in_help() {
    let mut record = Tuned {
        target: Target::Remote("db.example.com".to_owned()),
        ..Tuned::default()
    };
    let registry = Registry::build(&mut record).expect("registry builds");

    let defaults: Vec<_> = registry.slots().iter().map(|slot| slot.default_text()).collect();
    assert_eq!(
        defaults,
        [Some("normal"), Some(r#""db.example.com""#), Some("80")]
    );

    let mut record = Dated {
        since: Date {
            year: 1970,
            month: 1,
            day: 1,
        },
        dates: Vec::new(),
    };
    let settings = Settings::new("dated");
    let registry = Registry::build(&mut record).expect("registry builds");

    let help = Help {
        settings: &settings,
        registry: &registry,
    }
    .to_string();

    assert!(help.contains("  --since <SINCE>\n"), "{help}");
    assert!(help.contains("  --dates=[]\n"), "{help}");
}
