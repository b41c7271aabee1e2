use clap::builder::NonEmptyStringValueParser;
use clap::{CommandFactory, Parser};
use kafka_publish::kafka::KafkaPublisher;
use kafka_publish::{config, OutboundMessage, Result};
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Bound on the delivery-confirmation wait. Fixed, not flag-configurable.
const DELIVERY_TIMEOUT: Duration = Duration::from_millis(15_000);

#[derive(Parser, Debug)]
#[command(name = "kafka-publish")]
#[command(about = "Publish a single message to a Kafka topic", long_about = None)]
#[command(disable_version_flag = true)]
struct Args {
    // The three publish arguments are required, but enforced after parsing
    // so a version query can short-circuit without them.
    #[arg(
        short, long, value_name = "FILE",
        help = "Properties-format broker configuration file. Required parameter.",
        value_parser = NonEmptyStringValueParser::new()
    )]
    config: Option<String>,

    #[arg(
        short, long,
        help = "Kafka topic. Required parameter.",
        value_parser = NonEmptyStringValueParser::new()
    )]
    topic: Option<String>,

    #[arg(
        short, long,
        help = "Kafka message. Required parameter.",
        value_parser = NonEmptyStringValueParser::new()
    )]
    message: Option<String>,

    #[arg(short, long, help = "Message key.")]
    key: Option<String>,

    #[arg(long, help = "Message headers, formatted as k1=v1,k2=v2.")]
    headers: Option<String>,

    #[arg(long, help = "Show version information.")]
    version: bool,

    #[arg(short, long, help = "Verbose logging")]
    verbose: bool,

    #[arg(short, long, help = "Enable JSON output for logs")]
    json_logs: bool,
}

impl Args {
    /// Returns the three publish arguments, or `None` when any is missing.
    fn require_publish_args(&self) -> Option<(&str, &str, &str)> {
        match (
            self.config.as_deref(),
            self.topic.as_deref(),
            self.message.as_deref(),
        ) {
            (Some(config), Some(topic), Some(message)) => Some((config, topic, message)),
            _ => None,
        }
    }
}

/// Build-time version metadata, stamped via environment variables at
/// compile time and empty otherwise.
struct VersionInfo {
    tag: &'static str,
    commit: &'static str,
    source_url: &'static str,
}

impl VersionInfo {
    const fn from_build() -> Self {
        Self {
            tag: match option_env!("KAFKA_PUBLISH_TAG") {
                Some(tag) => tag,
                None => "",
            },
            commit: match option_env!("KAFKA_PUBLISH_COMMIT") {
                Some(commit) => commit,
                None => "",
            },
            source_url: match option_env!("KAFKA_PUBLISH_SOURCE_URL") {
                Some(url) => url,
                None => "",
            },
        }
    }
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                    ExitCode::SUCCESS
                }
                _ => ExitCode::FAILURE,
            };
        }
    };

    // Version queries never touch configuration or the network, and
    // short-circuit before the publish arguments are validated.
    if args.version {
        print_version(&VersionInfo::from_build());
        return ExitCode::SUCCESS;
    }

    let Some((config_path, topic, message_text)) = args.require_publish_args() else {
        let err = Args::command().error(
            clap::error::ErrorKind::MissingRequiredArgument,
            "the --config, --topic and --message arguments are required",
        );
        let _ = err.print();
        return ExitCode::FAILURE;
    };

    init_logging(args.json_logs, args.verbose);

    match run(
        config_path,
        topic,
        message_text,
        args.key.as_deref(),
        args.headers.as_deref(),
    ) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

#[tokio::main]
async fn run(
    config_path: &str,
    topic: &str,
    message_text: &str,
    key: Option<&str>,
    headers: Option<&str>,
) -> Result<()> {
    info!("Loading broker configuration from {}", config_path);
    let options = config::load_properties(Path::new(config_path))?;
    debug!(option_count = options.len(), "Broker configuration loaded");

    let message = OutboundMessage::build(topic, message_text, key, headers)?;

    let publisher = KafkaPublisher::new(&options)?;

    let handle = publisher.submit(&message)?;
    info!(topic = %topic, "Message queued, awaiting delivery confirmation");

    let delivery = handle.wait(DELIVERY_TIMEOUT).await?;

    println!(
        "Delivered successfully to {}[{}]@{}",
        topic, delivery.partition, delivery.offset
    );

    Ok(())
}

fn print_version(info: &VersionInfo) {
    let version = if info.tag.is_empty() {
        env!("CARGO_PKG_VERSION")
    } else {
        info.tag.trim_start_matches('v')
    };

    println!("version: {version}");
    if !info.tag.is_empty() {
        println!("tag: {}", info.tag);
    }
    if !info.commit.is_empty() {
        println!("commit: {}", info.commit);
    }
    if !info.source_url.is_empty() {
        println!("source: {}", info.source_url);
    }
}

fn init_logging(json: bool, verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("kafka_publish=debug,info")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("kafka_publish=info,warn"))
    };

    // Diagnostics go to stderr; stdout carries only version text and the
    // delivery confirmation line.
    let fmt_layer = if json {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(false)
            .with_span_list(false)
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
