//! Keyguard message tool
//!
//! Encodes, decodes and probes keyguard wire messages from the command line.

mod config;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use keyguard_messages::{
    EnrollRequest, EnrollResponse, KeyguardMessage, SizedBuffer, Status, VerifyRequest,
    VerifyResponse,
};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use config::CliConfig;

#[derive(Parser, Debug)]
#[command(name = "keyguard")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "keyguard.toml")]
    config: String,

    /// Run in verbose mode
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a message and print it as hex
    Encode {
        #[command(subcommand)]
        message: EncodeCommands,
    },
    /// Decode a hex message and print its fields
    Decode {
        /// Message type
        kind: MessageKind,
        /// Serialized message as hex
        hex: String,
        /// Print secret field bytes
        #[arg(long)]
        reveal: bool,
    },
    /// Decode a message from every start offset of the input
    Scan {
        /// Message type
        kind: MessageKind,
        /// Arbitrary bytes as hex
        hex: String,
    },
}

#[derive(Subcommand, Debug)]
enum EncodeCommands {
    /// Enrollment request
    EnrollRequest {
        #[arg(long)]
        user_id: Option<u32>,
        /// Password as hex
        #[arg(long)]
        password: String,
    },
    /// Enrollment response
    EnrollResponse {
        #[arg(long)]
        user_id: Option<u32>,
        /// Enrolled password handle as hex
        #[arg(long)]
        handle: String,
    },
    /// Verification request
    VerifyRequest {
        #[arg(long)]
        user_id: Option<u32>,
        /// Enrolled password handle as hex
        #[arg(long)]
        handle: String,
        /// Password as hex
        #[arg(long)]
        password: String,
    },
    /// Verification response
    VerifyResponse {
        #[arg(long)]
        user_id: Option<u32>,
        /// Verification token as hex
        #[arg(long)]
        token: String,
    },
    /// Error-only message
    Error,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum MessageKind {
    EnrollRequest,
    EnrollResponse,
    VerifyRequest,
    VerifyResponse,
}

/// Named buffer fields of a message, in wire order
trait Fields {
    fn fields(&self) -> Vec<(&'static str, &SizedBuffer)>;
}

impl Fields for EnrollRequest {
    fn fields(&self) -> Vec<(&'static str, &SizedBuffer)> {
        vec![("provided_password", self.provided_password())]
    }
}

impl Fields for EnrollResponse {
    fn fields(&self) -> Vec<(&'static str, &SizedBuffer)> {
        vec![("enrolled_password_handle", self.enrolled_password_handle())]
    }
}

impl Fields for VerifyRequest {
    fn fields(&self) -> Vec<(&'static str, &SizedBuffer)> {
        vec![
            ("password_handle", self.password_handle()),
            ("provided_password", self.provided_password()),
        ]
    }
}

impl Fields for VerifyResponse {
    fn fields(&self) -> Vec<(&'static str, &SizedBuffer)> {
        vec![("verification_token", self.verification_token())]
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging; stdout is reserved for command output
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config = CliConfig::load(&args.config)?;
    debug!("Loaded configuration from {}", args.config);

    match args.command {
        Commands::Encode { message } => {
            let bytes = encode(message, &config)?;
            println!("{}", format_hex(&bytes, config.output.uppercase));
        }
        Commands::Decode { kind, hex, reveal } => {
            let bytes = parse_hex(&hex)?;
            let reveal = reveal || config.output.reveal_secrets;
            let report = match kind {
                MessageKind::EnrollRequest => decode::<EnrollRequest>(&bytes, reveal),
                MessageKind::EnrollResponse => decode::<EnrollResponse>(&bytes, reveal),
                MessageKind::VerifyRequest => decode::<VerifyRequest>(&bytes, reveal),
                MessageKind::VerifyResponse => decode::<VerifyResponse>(&bytes, reveal),
            };
            print!("{}", report);
        }
        Commands::Scan { kind, hex } => {
            let bytes = parse_hex(&hex)?;
            let (ok, invalid) = match kind {
                MessageKind::EnrollRequest => scan::<EnrollRequest>(&bytes),
                MessageKind::EnrollResponse => scan::<EnrollResponse>(&bytes),
                MessageKind::VerifyRequest => scan::<VerifyRequest>(&bytes),
                MessageKind::VerifyResponse => scan::<VerifyResponse>(&bytes),
            };
            info!("Scanned {} offsets", bytes.len());
            println!("ok: {}", ok);
            println!("invalid: {}", invalid);
        }
    }

    Ok(())
}

fn encode(command: EncodeCommands, config: &CliConfig) -> Result<Vec<u8>> {
    let default_user = config.defaults.user_id;
    let bytes = match command {
        EncodeCommands::EnrollRequest { user_id, password } => EnrollRequest::new(
            user_id.unwrap_or(default_user),
            parse_buffer(&password).context("password")?,
        )
        .serialize()?,
        EncodeCommands::EnrollResponse { user_id, handle } => EnrollResponse::new(
            user_id.unwrap_or(default_user),
            parse_buffer(&handle).context("handle")?,
        )
        .serialize()?,
        EncodeCommands::VerifyRequest {
            user_id,
            handle,
            password,
        } => VerifyRequest::new(
            user_id.unwrap_or(default_user),
            parse_buffer(&handle).context("handle")?,
            parse_buffer(&password).context("password")?,
        )
        .serialize()?,
        EncodeCommands::VerifyResponse { user_id, token } => VerifyResponse::new(
            user_id.unwrap_or(default_user),
            parse_buffer(&token).context("token")?,
        )
        .serialize()?,
        EncodeCommands::Error => VerifyResponse::error(Status::Invalid).serialize()?,
    };
    debug!("Encoded {} bytes", bytes.len());
    Ok(bytes)
}

/// Decode `bytes` as `M` and render the result
fn decode<M: KeyguardMessage + Fields + Default>(bytes: &[u8], reveal: bool) -> String {
    let mut message = M::default();
    let mut report = String::new();

    match message.deserialize(bytes) {
        Ok(()) => {
            report.push_str("status: ok\n");
            report.push_str(&format!("user_id: {}\n", message.user_id()));
            for (name, buffer) in message.fields() {
                if reveal {
                    report.push_str(&format!(
                        "{}: {} bytes {}\n",
                        name,
                        buffer.len(),
                        hex::encode(buffer.as_slice())
                    ));
                } else {
                    report.push_str(&format!("{}: {} bytes\n", name, buffer.len()));
                }
            }
        }
        Err(e) => {
            debug!("Decode failed: {}", e);
            report.push_str("status: invalid\n");
            report.push_str(&format!("reason: {}\n", e));
        }
    }

    report
}

/// Decode into one live message from every start offset of `bytes`
///
/// Returns the number of offsets that decoded OK and the number that did not.
fn scan<M: KeyguardMessage + Default>(bytes: &[u8]) -> (usize, usize) {
    let mut message = M::default();
    let mut ok = 0;
    let mut invalid = 0;
    for start in 0..bytes.len() {
        match message.deserialize(&bytes[start..]) {
            Ok(()) => ok += 1,
            Err(_) => invalid += 1,
        }
    }
    (ok, invalid)
}

fn parse_hex(text: &str) -> Result<Vec<u8>> {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.len() % 2 != 0 {
        bail!("Hex input has an odd number of digits");
    }
    hex::decode(&cleaned).context("Invalid hex input")
}

fn parse_buffer(text: &str) -> Result<SizedBuffer> {
    Ok(SizedBuffer::from(parse_hex(text)?))
}

fn format_hex(bytes: &[u8], uppercase: bool) -> String {
    if uppercase {
        hex::encode_upper(bytes)
    } else {
        hex::encode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_enroll_request_uses_default_user() {
        let mut config = CliConfig::default();
        config.defaults.user_id = 3857;

        let bytes = encode(
            EncodeCommands::EnrollRequest {
                user_id: None,
                password: "7077".to_string(),
            },
            &config,
        )
        .unwrap();

        assert_eq!(format_hex(&bytes, false), "00000000110f0000020000007077");
    }

    #[test]
    fn test_encode_error() {
        let bytes = encode(EncodeCommands::Error, &CliConfig::default()).unwrap();
        assert_eq!(format_hex(&bytes, true), "01000000");
    }

    #[test]
    fn test_decode_hides_secrets() {
        let bytes = parse_hex("00000000 01000000 02000000 7077").unwrap();

        let hidden = decode::<EnrollRequest>(&bytes, false);
        assert!(hidden.contains("status: ok"));
        assert!(hidden.contains("provided_password: 2 bytes\n"));
        assert!(!hidden.contains("7077"));

        let revealed = decode::<EnrollRequest>(&bytes, true);
        assert!(revealed.contains("provided_password: 2 bytes 7077"));
    }

    #[test]
    fn test_decode_invalid() {
        let report = decode::<VerifyResponse>(&[1, 0, 0, 0], false);
        assert!(report.contains("status: invalid"));
    }

    #[test]
    fn test_scan_counts_every_offset() {
        let bytes = VerifyResponse::new(5, SizedBuffer::from_slice(b"token"))
            .serialize()
            .unwrap();

        let (ok, invalid) = scan::<VerifyResponse>(&bytes);
        assert_eq!(ok + invalid, bytes.len());
        assert!(ok >= 1);
    }

    #[test]
    fn test_parse_hex_rejects_odd_length() {
        assert!(parse_hex("abc").is_err());
        assert!(parse_hex("zz").is_err());
    }
}
