//! dtx-demo: runs both handshake roles over an in-process transport.
//!
//! An optional attacker sits between the two tasks and alters one message.
//! Exit status: 0 codes match, 1 handshake aborted, 2 codes differ,
//! 3 configuration could not be loaded.

use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{bail, Context};
use bytes::Bytes;
use clap::{Parser, ValueEnum};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dtx_core::{
    harness::{Tamper, TransportView},
    ClientSession, HandshakeConfig, IdentityCertificate, ServerSession, SessionError,
    ShortAuthenticationCode, WireMessage,
};

#[derive(Parser, Debug)]
#[command(name = "dtx-demo")]
#[command(version, about = "Device transfer short-authentication-code handshake demo")]
struct Cli {
    /// Config file path (TOML). Falls back to environment and defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Message an on-path attacker alters
    #[arg(long, value_enum, default_value_t = TamperArg::None)]
    tamper: TamperArg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TamperArg {
    None,
    ClientCert,
    Commitment,
    ClientRandom,
    ServerRandom,
}

impl From<TamperArg> for Tamper {
    fn from(arg: TamperArg) -> Self {
        match arg {
            TamperArg::None => Tamper::None,
            TamperArg::ClientCert => Tamper::SubstituteClientCertificate,
            TamperArg::Commitment => Tamper::CorruptCommitment,
            TamperArg::ClientRandom => Tamper::CorruptClientRandom,
            TamperArg::ServerRandom => Tamper::CorruptServerRandom,
        }
    }
}

const EXIT_ABORTED: u8 = 1;
const EXIT_CODES_DIFFER: u8 = 2;
const EXIT_CONFIG_ERROR: u8 = 3;

fn load_config(path: Option<&Path>) -> anyhow::Result<HandshakeConfig> {
    let config = match path {
        Some(path) => HandshakeConfig::load_from_file(path),
        None => HandshakeConfig::load_from_env(),
    };
    config.context("loading handshake config")
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return Ok(ExitCode::from(EXIT_CONFIG_ERROR));
        }
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let tamper = Tamper::from(cli.tamper);
    let view = TransportView::establish(&config.identity_provider(), tamper)
        .context("creating transfer identities")?;

    // client <-> attacker <-> server
    let (client_tx, mut relay_from_client) = mpsc::channel::<Bytes>(4);
    let (relay_to_server, server_rx) = mpsc::channel::<Bytes>(4);
    let (server_tx, mut relay_from_server) = mpsc::channel::<Bytes>(4);
    let (relay_to_client, client_rx) = mpsc::channel::<Bytes>(4);

    let client = tokio::spawn(run_client(
        view.client_certificate.clone(),
        view.server_certificate.clone(),
        client_tx,
        client_rx,
    ));
    let server = tokio::spawn(run_server(
        view.server_certificate,
        view.client_certificate_seen_by_server,
        server_tx,
        server_rx,
    ));
    let relay = tokio::spawn(async move {
        loop {
            tokio::select! {
                Some(frame) = relay_from_client.recv() => {
                    if relay_to_server.send(relay_frame(tamper, &frame)?).await.is_err() {
                        break;
                    }
                }
                Some(frame) = relay_from_server.recv() => {
                    if relay_to_client.send(relay_frame(tamper, &frame)?).await.is_err() {
                        break;
                    }
                }
                else => break,
            }
        }
        Ok::<_, anyhow::Error>(())
    });

    let server_result = server.await.context("server task panicked")?;
    let client_result = client.await.context("client task panicked")?;
    relay.abort();

    let server_code = match server_result {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "server aborted the transfer");
            println!("TRANSFER ABORTED: {}", e);
            return Ok(ExitCode::from(EXIT_ABORTED));
        }
    };
    let client_code = client_result?;

    println!("CLIENT_CODE={}", client_code);
    println!("SERVER_CODE={}", server_code);
    if client_code == server_code {
        info!("codes match");
        println!("Codes match. Confirm on both devices only if they show {}.", client_code);
        Ok(ExitCode::SUCCESS)
    } else {
        warn!("codes differ");
        println!("Codes DIFFER. Do not confirm this transfer.");
        Ok(ExitCode::from(EXIT_CODES_DIFFER))
    }
}

async fn run_client(
    own: IdentityCertificate,
    peer: IdentityCertificate,
    tx: mpsc::Sender<Bytes>,
    mut rx: mpsc::Receiver<Bytes>,
) -> anyhow::Result<ShortAuthenticationCode> {
    let (mut session, commitment) = ClientSession::start(own, peer);
    tx.send(commitment.encode()).await.context("sending commitment")?;

    let frame = rx.recv().await.context("transport closed before server random")?;
    if let Some(reply) = session.handle_frame(&frame)? {
        tx.send(reply).await.context("sending client random")?;
    }

    session
        .short_authentication_code()
        .context("client code not available")
}

async fn run_server(
    own: IdentityCertificate,
    observed_peer: IdentityCertificate,
    tx: mpsc::Sender<Bytes>,
    mut rx: mpsc::Receiver<Bytes>,
) -> Result<ShortAuthenticationCode, SessionError> {
    let mut session = ServerSession::new(own, observed_peer);

    while !session.state().is_terminal() {
        let Some(frame) = rx.recv().await else {
            break;
        };
        if let Some(reply) = session.handle_frame(&frame)? {
            if tx.send(reply).await.is_err() {
                break;
            }
        }
        if let Some(code) = session.short_authentication_code() {
            return Ok(code);
        }
    }

    Err(SessionError::UnexpectedMessage {
        message: "end of stream",
        state: session.state().as_str(),
    })
}

fn relay_frame(tamper: Tamper, frame: &[u8]) -> anyhow::Result<Bytes> {
    let msg = match WireMessage::decode(frame) {
        Ok(msg) => msg,
        Err(e) => bail!("relay received malformed frame: {}", e),
    };
    let relayed = match msg {
        WireMessage::Commitment(c) => WireMessage::Commitment(tamper.relay_commitment(c)),
        WireMessage::ServerRandom(r) => WireMessage::ServerRandom(tamper.relay_server_random(r)),
        WireMessage::ClientRandom(r) => WireMessage::ClientRandom(tamper.relay_client_random(r)),
    };
    Ok(relayed.encode())
}
