// src/main.rs

use clap::{Args, Parser, Subcommand};
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

use http::StatusCode;
use unicorn_adapter::logging::logger;
use unicorn_adapter::openrtb::request::BidRequest;
use unicorn_adapter::{
    builder, AdapterConfig, AdapterError, AdapterResult, Bidder, ExtraRequestInfo, ResponseData,
};

/// 离线回放工具：对本地 JSON 文件执行适配器转换，不发起任何网络请求
#[derive(Parser, Debug)]
#[command(author = "whiteCcinn", version = "1.0", about = "Offline replay tool for the UNICORN bidder adapter")]
struct CliArgs {
    #[arg(long, default_value = "logs")]
    log_dir: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 执行 make_requests，输出发往 UNICORN 的请求
    Request {
        #[command(flatten)]
        adapter: AdapterArgs,
        /// OpenRTB BidRequest JSON 文件
        #[arg(short, long)]
        input: PathBuf,
    },
    /// 先执行 make_requests，再用给定的状态码与响应体执行 make_bids
    Bids {
        #[command(flatten)]
        adapter: AdapterArgs,
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long, default_value_t = 200)]
        status: u16,
        /// UNICORN 响应体 JSON 文件，省略时视为空响应体
        #[arg(short, long)]
        body: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct AdapterArgs {
    /// 适配器配置文件（JSON）
    #[arg(long)]
    config: Option<PathBuf>,
    /// 直接指定 UNICORN endpoint，使用默认币种与拍卖类型
    #[arg(long)]
    endpoint: Option<String>,
}

impl AdapterArgs {
    fn load(&self) -> AdapterResult<AdapterConfig> {
        match (&self.config, &self.endpoint) {
            (Some(path), _) => AdapterConfig::from_file(path),
            (None, Some(endpoint)) => Ok(AdapterConfig::new(endpoint)),
            (None, None) => Err(AdapterError::Config("either --config or --endpoint is required".to_string())),
        }
    }
}

fn read_request(path: &PathBuf) -> AdapterResult<BidRequest> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn errors_json(errors: &[AdapterError]) -> Value {
    Value::Array(errors.iter().map(|e| json!(e.to_string())).collect())
}

fn run(command: Command) -> AdapterResult<Value> {
    match command {
        Command::Request { adapter, input } => {
            let bidder = builder("unicorn", adapter.load()?)?;
            let mut request = read_request(&input)?;
            let (calls, errors) = bidder.make_requests(&mut request, &ExtraRequestInfo::default());

            let mut requests = Vec::with_capacity(calls.len());
            for call in &calls {
                let body: Value = serde_json::from_slice(&call.body)?;
                requests.push(json!({
                    "method": call.method.as_str(),
                    "uri": call.uri,
                    "body": body,
                }));
            }
            Ok(json!({ "requests": requests, "errors": errors_json(&errors) }))
        }
        Command::Bids { adapter, input, status, body } => {
            let bidder = builder("unicorn", adapter.load()?)?;
            let mut request = read_request(&input)?;
            let (calls, errors) = bidder.make_requests(&mut request, &ExtraRequestInfo::default());
            let Some(call) = calls.first() else {
                info!(request_id = %request.id, "no outbound request, nothing to replay");
                return Ok(json!({ "bids": Value::Null, "errors": errors_json(&errors) }));
            };

            let status = StatusCode::from_u16(status)
                .map_err(|e| AdapterError::Config(format!("invalid status code: {}", e)))?;
            let raw_body = match body {
                Some(path) => fs::read(path)?,
                None => Vec::new(),
            };

            let (response, errors) = bidder.make_bids(&request, call, &ResponseData::new(status, raw_body));
            Ok(json!({ "bids": serde_json::to_value(&response)?, "errors": errors_json(&errors) }))
        }
    }
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let _guard = match logger::init(&args.log_dir, "unicorn_replay.json") {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(args.command) {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output).unwrap_or_else(|_| output.to_string()));
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "replay failed");
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
