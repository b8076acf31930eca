//! 段编解码工具
//!
//! 解码十六进制数据报、构造并编码段、打印生效的连接参数。

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rudp_rs::config::{ConnectionProfile, ProfileError};
use rudp_rs::hex_text;
use rudp_rs::segment::{BuildError, Segment, SegmentKind, SegmentSummary};
use thiserror::Error as ThisError;
use tracing::{debug, info};

#[derive(Debug, Parser)]
#[command(name = "segment-tool", about = "Reliable UDP segment codec tool")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Decode hex-encoded datagrams and describe them
    Decode {
        /// One hex string per datagram
        #[arg(required = true)]
        hex: Vec<String>,
        /// Print a JSON summary per segment instead of the one-line description
        #[arg(long)]
        json: bool,
    },
    /// Build a segment and print its checksummed bytes as hex
    Encode {
        /// syn, nul, eak, rst, clz, fin, ack or dat
        kind: SegmentKind,
        #[arg(long)]
        seq: u8,
        /// Piggybacked acknowledgment (required for ack, eak and dat)
        #[arg(long)]
        ack: Option<u8>,
        /// DAT payload as hex
        #[arg(long)]
        data: Option<String>,
        /// EAK out-of-sequence numbers, comma separated
        #[arg(long, value_delimiter = ',')]
        eak: Vec<u8>,
        /// Cover the whole segment with the checksum (CHK bit)
        #[arg(long)]
        full_checksum: bool,
        /// JSON connection profile for SYN parameters
        #[arg(long)]
        profile: Option<PathBuf>,
    },
    /// Print the effective connection profile as JSON
    Profile {
        #[arg(long)]
        profile: Option<PathBuf>,
    },
}

#[derive(Debug, ThisError)]
enum ToolError {
    #[error("{0}")]
    Hex(#[from] hex::FromHexError),
    #[error("{0}")]
    Build(#[from] BuildError),
    #[error("{0}")]
    Profile(#[from] ProfileError),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("{kind} segments need --{arg}")]
    MissingArg { kind: SegmentKind, arg: &'static str },
}

fn load_profile(path: Option<&PathBuf>) -> Result<ConnectionProfile, ProfileError> {
    match path {
        Some(path) => ConnectionProfile::from_path(path),
        None => Ok(ConnectionProfile::default()),
    }
}

/// 解码全部输入；有任意一个无效时返回 false
fn decode(inputs: &[String], json: bool) -> Result<bool, ToolError> {
    let mut all_valid = true;
    for input in inputs {
        let bytes = match hex_text::decode(input) {
            Ok(bytes) => bytes,
            Err(err) => {
                eprintln!("malformed hex {input:?}: {err}");
                all_valid = false;
                continue;
            }
        };
        match Segment::parse(&bytes) {
            Ok(segment) => {
                debug!(%segment, "解码成功");
                if json {
                    println!("{}", serde_json::to_string(&SegmentSummary::from(&segment))?);
                } else {
                    println!("{segment}");
                }
            }
            Err(err) => {
                eprintln!("{err}");
                all_valid = false;
            }
        }
    }
    Ok(all_valid)
}

fn build(
    kind: SegmentKind,
    seq: u8,
    ack: Option<u8>,
    data: Option<&str>,
    eak: Vec<u8>,
    profile: Option<&PathBuf>,
) -> Result<Segment, ToolError> {
    let require_ack = || ack.ok_or(ToolError::MissingArg { kind, arg: "ack" });

    let mut segment = match kind {
        SegmentKind::Syn => Segment::syn(seq, load_profile(profile)?.syn_parameters()?)?,
        SegmentKind::Nul => Segment::nul(seq),
        SegmentKind::Rst => Segment::rst(seq),
        SegmentKind::Clz => Segment::clz(seq),
        SegmentKind::Fin => Segment::fin(seq),
        SegmentKind::Ack => Segment::ack(seq, require_ack()?),
        SegmentKind::Eak => Segment::eak(seq, require_ack()?, eak)?,
        SegmentKind::Dat => {
            let data = data.ok_or(ToolError::MissingArg { kind, arg: "data" })?;
            Segment::data(seq, require_ack()?, hex_text::decode(data)?)?
        }
    };
    if let Some(ack) = ack {
        segment.set_ack(ack);
    }
    Ok(segment)
}

fn run(args: Args) -> Result<ExitCode, ToolError> {
    match args.command {
        Command::Decode { hex: inputs, json } => {
            let all_valid = decode(&inputs, json)?;
            Ok(if all_valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Encode {
            kind,
            seq,
            ack,
            data,
            eak,
            full_checksum,
            profile,
        } => {
            let mut segment = build(kind, seq, ack, data.as_deref(), eak, profile.as_ref())?;
            segment.set_full_checksum(full_checksum);
            info!(%segment, "编码段");
            println!("{}", hex::encode(&segment.to_bytes_with_checksum()));
            Ok(ExitCode::SUCCESS)
        }
        Command::Profile { profile } => {
            let profile = load_profile(profile.as_ref())?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> ExitCode {
    // 初始化 tracing（日志写到 stderr，stdout 只输出结果）
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
    }
}
