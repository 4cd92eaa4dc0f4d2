use anyhow::Context as _;
use clap::{value_parser, Arg, ArgAction, Command};
use platen_engine::{
    ConsoleMessenger, EngineConfig, Phase, PlainTextRenderer, ReceiptMeta, ReceiptRenderer,
    SessionEngine,
};
use platen_order::{parse_order, SessionId};
use platen_pricing::{price_order, RateTable, StlMassEstimator};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncBufReadExt;
use tracing_subscriber::EnvFilter;

fn pricing_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("models-dir")
            .long("models-dir")
            .default_value("data/models")
            .value_parser(value_parser!(PathBuf))
            .help("Directory uploads are stored in and models are read from"),
    )
    .arg(
        Arg::new("material")
            .long("material")
            .default_value("PETG")
            .help("Material every order line is priced as"),
    )
    .arg(
        Arg::new("executor")
            .long("executor")
            .default_value("")
            .help("Executor name printed on receipts"),
    )
    .arg(
        Arg::new("customer")
            .long("customer")
            .default_value("")
            .help("Customer name printed on receipts"),
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Command::new("platen-engine")
        .version(platen_engine::VERSION)
        .about("Print-shop order intake and quoting engine")
        .arg_required_else_help(true)
        .subcommand(
            pricing_args(
                Command::new("chat")
                    .about("Interactive console session (/start, /file <path>, /done, /reset)"),
            )
            .arg(
                Arg::new("debounce-ms")
                    .long("debounce-ms")
                    .default_value("1500")
                    .value_parser(value_parser!(u64))
                    .help("Quiescence delay before the finish prompt refreshes"),
            ),
        )
        .subcommand(
            pricing_args(Command::new("simulate").about("Scripted end-to-end order run"))
                .arg(
                    Arg::new("parts")
                        .long("parts")
                        .default_value("3")
                        .value_parser(value_parser!(usize))
                        .help("Number of parts in the simulated order"),
                )
                .arg(
                    Arg::new("debounce-ms")
                        .long("debounce-ms")
                        .default_value("200")
                        .value_parser(value_parser!(u64))
                        .help("Quiescence delay before the finish prompt refreshes"),
                ),
        )
        .subcommand(
            pricing_args(Command::new("quote").about("Price an order file without a session"))
                .arg(
                    Arg::new("order")
                        .long("order")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("File with order text ('name quantity' per line)"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Emit the receipt as JSON instead of plain text"),
                ),
        );

    match cli.get_matches().subcommand() {
        Some(("chat", args)) => {
            let config = config_from(args)
                .with_debounce_delay(Duration::from_millis(*args.get_one::<u64>("debounce-ms").unwrap()));
            chat(config).await
        }
        Some(("simulate", args)) => {
            let parts = *args.get_one::<usize>("parts").unwrap();
            let config = config_from(args)
                .with_debounce_delay(Duration::from_millis(*args.get_one::<u64>("debounce-ms").unwrap()));
            simulate(config, parts).await
        }
        Some(("quote", args)) => {
            let order = args.get_one::<PathBuf>("order").unwrap();
            let json = args.get_flag("json");
            quote(config_from(args), order, json)
        }
        _ => unreachable!("arg_required_else_help"),
    }
}

fn config_from(args: &clap::ArgMatches) -> EngineConfig {
    EngineConfig::new()
        .with_models_dir(args.get_one::<PathBuf>("models-dir").unwrap().clone())
        .with_material(args.get_one::<String>("material").unwrap().clone())
        .with_parties(
            args.get_one::<String>("executor").unwrap().clone(),
            args.get_one::<String>("customer").unwrap().clone(),
        )
}

fn build_engine(config: EngineConfig) -> Arc<SessionEngine> {
    let estimator = StlMassEstimator::new(&config.models_dir, &config.model_extension);
    Arc::new(SessionEngine::new(
        config,
        Arc::new(ConsoleMessenger::new()),
        Arc::new(estimator),
        Arc::new(PlainTextRenderer),
        RateTable::default(),
    ))
}

async fn chat(config: EngineConfig) -> anyhow::Result<()> {
    let engine = build_engine(config);
    let id = SessionId::new(0);

    println!("platen chat: /start, /file <path>, /done, /reset, /quit");
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line {
            "" => {}
            "/quit" | "/exit" => break,
            "/start" => engine.start(id).await?,
            "/done" => engine.finish(id).await?,
            "/reset" => engine.reset(id).await?,
            _ if line.starts_with("/file") => {
                let path = PathBuf::from(line.trim_start_matches("/file").trim());
                let filename = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("upload.stl")
                    .to_string();
                match std::fs::read(&path) {
                    Ok(bytes) => engine.deliver(id, &filename, &bytes).await?,
                    Err(e) => println!("cannot read {}: {e}", path.display()),
                }
            }
            text => match engine.phase(id).await {
                Phase::AwaitingOrder => engine.submit_order(id, text).await?,
                Phase::AwaitingFiles => engine.non_file_input(id).await?,
                Phase::Idle => println!("no order in progress; /start to begin"),
            },
        }
    }
    Ok(())
}

async fn simulate(config: EngineConfig, parts: usize) -> anyhow::Result<()> {
    let delay = config.debounce_delay;
    let engine = build_engine(config);
    let id = SessionId::new(1);

    let names: Vec<String> = (1..=parts).map(|i| format!("part_{i}")).collect();
    let order_text = names
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{name} {}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    engine.start(id).await?;
    engine.submit_order(id, &order_text).await?;

    let model = tetrahedron_stl(20.0);
    for name in &names {
        engine
            .deliver(id, &format!("{name}.stl"), model.as_bytes())
            .await?;
    }

    // Let the debounce window pass so the refreshed prompt appears.
    tokio::time::sleep(delay + Duration::from_millis(100)).await;
    engine.finish(id).await?;

    if engine.phase(id).await != Phase::Idle {
        anyhow::bail!("simulation did not complete the order");
    }
    println!("simulation complete: {parts} parts ordered, receipt delivered");
    Ok(())
}

fn quote(config: EngineConfig, order_path: &PathBuf, json: bool) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(order_path)
        .with_context(|| format!("reading order file {}", order_path.display()))?;
    let lines = parse_order(&text)?;

    let estimator = StlMassEstimator::new(&config.models_dir, &config.model_extension);
    let receipt = price_order(&lines, &config.material, &estimator, &RateTable::default())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&receipt)?);
    } else {
        let meta = ReceiptMeta {
            executor: config.executor,
            customer: config.customer,
            printed_on: chrono::Local::now().date_naive(),
        };
        let document = PlainTextRenderer.render(&receipt, &meta)?;
        println!("{}", String::from_utf8_lossy(&document));
    }
    Ok(())
}

/// ASCII STL of a right tetrahedron with legs of `side` mm
///
/// Volume is side³/6, enough to exercise estimation end to end.
fn tetrahedron_stl(side: f32) -> String {
    let s = side;
    let vertices: [[[f32; 3]; 3]; 4] = [
        [[0.0, 0.0, 0.0], [0.0, s, 0.0], [s, 0.0, 0.0]],
        [[0.0, 0.0, 0.0], [s, 0.0, 0.0], [0.0, 0.0, s]],
        [[0.0, 0.0, 0.0], [0.0, 0.0, s], [0.0, s, 0.0]],
        [[s, 0.0, 0.0], [0.0, s, 0.0], [0.0, 0.0, s]],
    ];

    let mut out = String::from("solid part\n");
    for triangle in vertices {
        out.push_str("  facet normal 0 0 0\n    outer loop\n");
        for v in triangle {
            out.push_str(&format!("      vertex {} {} {}\n", v[0], v[1], v[2]));
        }
        out.push_str("    endloop\n  endfacet\n");
    }
    out.push_str("endsolid part\n");
    out
}
