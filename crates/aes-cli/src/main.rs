//! Command-line interface for the AES-128 CBC/CTR implementation.

#![forbid(unsafe_code)]

use std::fs;
use std::path::{Path, PathBuf};

use aes_modes::{Block, Cbc, Ctr, BLOCK_SIZE};
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// AES-128 CBC/CTR CLI.
#[derive(Parser)]
#[command(
    name = "aes-modes",
    version,
    author,
    about = "AES-128 encryption in CBC and CTR modes"
)]
struct Cli {
    /// Log at debug level (overrides RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decrypt the built-in known-answer cases and run an encrypt/decrypt demo.
    Demo,
    /// Encrypt a message; prints hex of `iv || ciphertext`.
    Enc(EncArgs),
    /// Decrypt hex of `iv || ciphertext`.
    Dec(DecArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Cipher block chaining with PKCS#7 padding.
    Cbc,
    /// Counter mode, whole-block counter.
    Ctr,
}

#[derive(Args)]
struct EncArgs {
    /// Mode of operation.
    #[arg(long, value_enum)]
    mode: Mode,
    /// AES-128 key as 32 hex characters.
    #[arg(long, value_name = "HEX")]
    key_hex: String,
    /// IV (CBC) or initial counter (CTR) as 32 hex characters; random if omitted.
    #[arg(long, value_name = "HEX")]
    iv_hex: Option<String>,
    /// Optional RNG seed for a reproducible IV.
    #[arg(long, conflicts_with = "iv_hex")]
    seed: Option<u64>,
    /// Plaintext given on the command line.
    #[arg(long, conflicts_with = "input", required_unless_present = "input")]
    text: Option<String>,
    /// Plaintext file.
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,
    /// Write hex output here instead of stdout.
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct DecArgs {
    /// Mode of operation.
    #[arg(long, value_enum)]
    mode: Mode,
    /// AES-128 key as 32 hex characters.
    #[arg(long, value_name = "HEX")]
    key_hex: String,
    /// Hex of `iv || ciphertext` given on the command line.
    #[arg(
        long = "hex",
        value_name = "HEX",
        conflicts_with = "input",
        required_unless_present = "input"
    )]
    data_hex: Option<String>,
    /// File holding hex of `iv || ciphertext`.
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,
    /// Write raw plaintext here instead of printing it.
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,
}

/// One of the fixed known-answer cases run by `demo`.
struct KnownCase {
    mode: Mode,
    key_hex: &'static str,
    data_hex: &'static str,
}

const KNOWN_CASES: [KnownCase; 4] = [
    KnownCase {
        mode: Mode::Cbc,
        key_hex: "140b41b22a29beb4061bda66b6747e14",
        data_hex: "4ca00ff4c898d61e1edbf1800618fb2828a226d160dad07883d04e008a7897ee2e4b7465d5290d0c0e6c6822236e1daafb94ffe0c5da05d9476be028ad7c1d81",
    },
    KnownCase {
        mode: Mode::Cbc,
        key_hex: "140b41b22a29beb4061bda66b6747e14",
        data_hex: "5b68629feb8606f9a6667670b75b38a5b4832d0f26e1ab7da33249de7d4afc48e713ac646ace36e872ad5fb8a512428a6e21364b0c374df45503473c5242a253",
    },
    KnownCase {
        mode: Mode::Ctr,
        key_hex: "36f18357be4dbd77f050515c73fcf9f2",
        data_hex: "69dda8455c7dd4254bf353b773304eec0ec7702330098ce7f7520d1cbbb20fc388d1b0adb5054dbd7370849dbf0b88d393f252e764f1f5f7ad97ef79d59ce29f5f51eeca32eabedd9afa9329",
    },
    KnownCase {
        mode: Mode::Ctr,
        key_hex: "36f18357be4dbd77f050515c73fcf9f2",
        data_hex: "770b80259ec33beb2561358a9f2dc617e46218c0a53cbeca695ae45faa8952aa0e311bde9d4e01726d3184c34451",
    },
];

const DEMO_PLAINTEXT: &str = "Hello, AES-CBC!";
const DEMO_KEY_HEX: &str = "140b41b22a29beb4061bda66b6747e14";
const DEMO_IV_HEX: &str = "4ca00ff4c898d61e1edbf1800618fb28";

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.command {
        Commands::Demo => cmd_demo(),
        Commands::Enc(args) => cmd_enc(&args),
        Commands::Dec(args) => cmd_dec(&args),
    }
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

fn cmd_demo() -> Result<()> {
    let key = parse_key_hex(DEMO_KEY_HEX)?;
    let iv = parse_block_hex(DEMO_IV_HEX).context("decode demo IV")?;
    println!("original plaintext: {DEMO_PLAINTEXT}");
    println!("key: {DEMO_KEY_HEX}");
    println!("iv: {DEMO_IV_HEX}");

    for mode in [Mode::Cbc, Mode::Ctr] {
        let ciphertext = encrypt(mode, &key, &iv, DEMO_PLAINTEXT.as_bytes())?;
        let decrypted = decrypt(mode, &key, &iv, &ciphertext)?;
        println!("{mode:?} ciphertext: {}", hex::encode(&ciphertext));
        println!("{mode:?} decrypted: {}", printable(&decrypted));
        if decrypted != DEMO_PLAINTEXT.as_bytes() {
            bail!("{mode:?} demo roundtrip failed");
        }
    }

    for (index, case) in KNOWN_CASES.iter().enumerate() {
        println!();
        println!("case {} ({:?} decryption)", index + 1, case.mode);
        // A failing case is reported and the remaining cases still run.
        match run_known_case(case) {
            Ok(plaintext) => {
                println!("plaintext (hex): {}", hex::encode(&plaintext));
                println!("plaintext (text): {}", printable(&plaintext));
            }
            Err(err) => eprintln!("error: {err:#}"),
        }
    }
    Ok(())
}

fn run_known_case(case: &KnownCase) -> Result<Vec<u8>> {
    let key = parse_key_hex(case.key_hex)?;
    let data = hex::decode(case.data_hex).context("decode case ciphertext hex")?;
    let (iv, body) = split_iv(&data)?;
    log::debug!("key {} iv {} body {} bytes", case.key_hex, hex::encode(iv), body.len());
    decrypt(case.mode, &key, &iv, body)
}

fn cmd_enc(args: &EncArgs) -> Result<()> {
    let key = parse_key_hex(&args.key_hex)?;
    let iv = match &args.iv_hex {
        Some(iv_hex) => parse_block_hex(iv_hex).context("decode IV hex")?,
        None => {
            let mut iv = [0u8; BLOCK_SIZE];
            seeded_rng(args.seed).fill_bytes(&mut iv);
            iv
        }
    };
    let plaintext = match (&args.text, &args.input) {
        (Some(text), _) => text.as_bytes().to_vec(),
        (None, Some(path)) => read_file(path)?,
        (None, None) => bail!("either --text or --input is required"),
    };

    let ciphertext = encrypt(args.mode, &key, &iv, &plaintext)?;
    let mut out = hex::encode(iv);
    out.push_str(&hex::encode(ciphertext));
    match &args.output {
        Some(path) => write_file(path, out.as_bytes())?,
        None => println!("{out}"),
    }
    Ok(())
}

fn cmd_dec(args: &DecArgs) -> Result<()> {
    let key = parse_key_hex(&args.key_hex)?;
    let data_hex = match (&args.data_hex, &args.input) {
        (Some(data_hex), _) => data_hex.clone(),
        (None, Some(path)) => String::from_utf8(read_file(path)?)
            .with_context(|| format!("{} is not UTF-8 hex", path.display()))?,
        (None, None) => bail!("either --hex or --input is required"),
    };
    let data = hex::decode(data_hex.trim()).context("decode ciphertext hex")?;
    let (iv, body) = split_iv(&data)?;

    let plaintext = decrypt(args.mode, &key, &iv, body)?;
    match &args.output {
        Some(path) => write_file(path, &plaintext)?,
        None => {
            println!("plaintext (hex): {}", hex::encode(&plaintext));
            println!("plaintext (text): {}", printable(&plaintext));
        }
    }
    Ok(())
}

fn encrypt(mode: Mode, key: &[u8], iv: &Block, plaintext: &[u8]) -> Result<Vec<u8>> {
    let ciphertext = match mode {
        Mode::Cbc => Cbc::new(key)?.encrypt(plaintext, iv),
        Mode::Ctr => Ctr::new(key)?.apply_keystream(plaintext, iv),
    };
    Ok(ciphertext)
}

fn decrypt(mode: Mode, key: &[u8], iv: &Block, ciphertext: &[u8]) -> Result<Vec<u8>> {
    let plaintext = match mode {
        Mode::Cbc => Cbc::new(key)?
            .decrypt(ciphertext, iv)
            .context("CBC decryption failed")?,
        Mode::Ctr => Ctr::new(key)?.apply_keystream(ciphertext, iv),
    };
    Ok(plaintext)
}

fn parse_key_hex(hex_str: &str) -> Result<Vec<u8>> {
    let bytes = hex::decode(hex_str.trim()).context("decode key hex")?;
    if bytes.len() != 16 {
        bail!("AES-128 key must be 16 bytes (32 hex characters)");
    }
    Ok(bytes)
}

fn parse_block_hex(hex_str: &str) -> Result<Block> {
    let bytes = hex::decode(hex_str.trim())?;
    match Block::try_from(bytes.as_slice()) {
        Ok(block) => Ok(block),
        Err(_) => bail!("expected 16 bytes (32 hex characters), got {}", bytes.len()),
    }
}

/// Splits `iv || body`, requiring at least the 16-byte IV.
fn split_iv(data: &[u8]) -> Result<(Block, &[u8])> {
    if data.len() < BLOCK_SIZE {
        bail!("input shorter than the 16-byte IV");
    }
    let (iv, body) = data.split_at(BLOCK_SIZE);
    let mut block = [0u8; BLOCK_SIZE];
    block.copy_from_slice(iv);
    Ok((block, body))
}

/// Renders bytes as ASCII, replacing anything unprintable with `.`.
fn printable(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| if (0x20..=0x7e).contains(&b) { b as char } else { '.' })
        .collect()
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("read {}", path.display()))
}

fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    fs::write(path, data).with_context(|| format!("write {}", path.display()))
}

fn seeded_rng(seed: Option<u64>) -> impl RngCore + CryptoRng {
    match seed {
        Some(value) => ChaCha20Rng::seed_from_u64(value),
        None => ChaCha20Rng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn seed_is_rejected_alongside_explicit_iv() {
        let base = ["aes-modes", "enc", "--mode", "cbc", "--key-hex", DEMO_KEY_HEX];
        let with_iv = ["--iv-hex", DEMO_IV_HEX, "--text", "hi"];
        let err = Cli::try_parse_from(base.iter().chain(&with_iv).chain(&["--seed", "7"]))
            .err()
            .expect("seed and iv conflict");
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
        assert!(Cli::try_parse_from(base.iter().chain(&with_iv)).is_ok());
        assert!(Cli::try_parse_from(base.iter().chain(&["--seed", "7", "--text", "hi"])).is_ok());
    }

    #[test]
    fn known_cases_decrypt_to_text() {
        let expected = [
            "Basic CBC mode encryption needs padding.",
            "Our implementation uses rand. IV",
            "CTR mode lets you build a stream cipher from a block cipher.",
            "Always avoid the two time pad!",
        ];
        for (case, text) in KNOWN_CASES.iter().zip(expected) {
            let plaintext = run_known_case(case).unwrap();
            assert_eq!(printable(&plaintext), text);
        }
    }

    #[test]
    fn demo_runs() {
        cmd_demo().unwrap();
    }

    #[test]
    fn parse_key_hex_validates() {
        assert_eq!(parse_key_hex(DEMO_KEY_HEX).unwrap().len(), 16);
        assert!(parse_key_hex("abc").is_err());
        assert!(parse_key_hex("zz0b41b22a29beb4061bda66b6747e14").is_err());
        assert!(parse_key_hex("140b41b22a29beb4").is_err());
    }

    #[test]
    fn parse_block_hex_requires_sixteen_bytes() {
        assert!(parse_block_hex(DEMO_IV_HEX).is_ok());
        assert!(parse_block_hex("00").is_err());
    }

    #[test]
    fn split_iv_requires_full_iv() {
        assert!(split_iv(&[0u8; 15]).is_err());
        let data: Vec<u8> = (0..20).collect();
        let (iv, body) = split_iv(&data).unwrap();
        assert_eq!(iv[15], 15);
        assert_eq!(body, &[16u8, 17, 18, 19]);
    }

    #[test]
    fn printable_masks_control_bytes() {
        assert_eq!(printable(b"ok\x00\x7f~"), "ok..~");
    }

    #[test]
    fn seeded_iv_is_reproducible() {
        let mut a = [0u8; 16];
        let mut b = [0u8; 16];
        seeded_rng(Some(7)).fill_bytes(&mut a);
        seeded_rng(Some(7)).fill_bytes(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn encrypt_then_decrypt_both_modes() {
        let key = parse_key_hex(DEMO_KEY_HEX).unwrap();
        let iv = parse_block_hex(DEMO_IV_HEX).unwrap();
        for mode in [Mode::Cbc, Mode::Ctr] {
            let ct = encrypt(mode, &key, &iv, b"round trip").unwrap();
            assert_eq!(decrypt(mode, &key, &iv, &ct).unwrap(), b"round trip");
        }
    }
}
