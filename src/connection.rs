//! IMAP connection and TLS helpers
//!
//! Opens the authenticated session every other module works on. Both
//! implicit TLS and STARTTLS end up on the same stream type, so the
//! rest of the crate only ever sees [`ImapSession`].

use crate::config::{ImapConfig, Security};
use crate::error::{Error, Result};
use async_imap::Session;
use rustls::RootCertStore;
use rustls::pki_types::ServerName;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_rustls::client::TlsStream;
use tokio_util::compat::{Compat, TokioAsyncReadCompatExt};
use tracing::{debug, info, warn};

/// A TLS-wrapped IMAP session.
pub type ImapSession = Session<Compat<TlsStream<TcpStream>>>;

/// Build a TLS connector.
///
/// Verifies against the bundled web PKI roots unless the config opts
/// out, in which case every certificate is accepted.
fn tls_connector(config: &ImapConfig) -> TlsConnector {
    let tls = if config.accept_invalid_certs {
        rustls::ClientConfig::builder()
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(DangerousVerifier))
            .with_no_client_auth()
    } else {
        let mut roots = RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        rustls::ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth()
    };
    TlsConnector::from(Arc::new(tls))
}

async fn handshake(config: &ImapConfig, tcp_stream: TcpStream) -> Result<TlsStream<TcpStream>> {
    let server_name = ServerName::try_from(config.host.clone())
        .map_err(|e| Error::Tls(format!("Invalid server name: {e}")))?;

    tls_connector(config)
        .connect(server_name, tcp_stream)
        .await
        .map_err(|e| Error::Tls(e.to_string()))
}

/// Open a fresh TLS-wrapped IMAP session.
///
/// Connects to `config.host:config.port` via TCP, secures the stream
/// according to `config.security`, logs in, and identifies the client
/// to servers that support RFC 2971 `ID`.
pub async fn connect(config: &ImapConfig) -> Result<ImapSession> {
    let addr = format!("{}:{}", config.host, config.port);
    debug!("Connecting to IMAP server at {} ({})", addr, config.security);

    let tcp_stream = TcpStream::connect(&addr).await?;

    let tls_stream = match config.security {
        Security::Tls => handshake(config, tcp_stream).await?,
        Security::StartTls => {
            let mut client = async_imap::Client::new(tcp_stream.compat());
            client
                .run_command_and_check_ok("STARTTLS", None)
                .await
                .map_err(|e| Error::Tls(format!("STARTTLS failed: {e}")))?;
            let inner = client.into_inner().into_inner();
            handshake(config, inner).await?
        }
    };

    let tls_client = async_imap::Client::new(tls_stream.compat());

    let mut session = tls_client
        .login(&config.username, &config.password)
        .await
        .map_err(|(e, _)| Error::Imap(format!("Login failed: {e}")))?;

    info!("Logged in as {}", config.username);

    identify(&mut session).await;
    Ok(session)
}

/// Send the client's name and version if the server speaks `ID`.
async fn identify(session: &mut ImapSession) {
    let supported = match session.capabilities().await {
        Ok(caps) => caps.has_str("ID"),
        Err(e) => {
            warn!("CAPABILITY failed, skipping ID: {}", e);
            return;
        }
    };
    if !supported {
        return;
    }

    let fields = [
        ("name", Some(env!("CARGO_PKG_NAME"))),
        ("version", Some(env!("CARGO_PKG_VERSION"))),
    ];
    if let Err(e) = session.id(fields).await {
        warn!("ID command failed: {}", e);
    }
}

/// Certificate verifier that accepts all certificates.
#[derive(Debug)]
struct DangerousVerifier;

impl rustls::client::danger::ServerCertVerifier for DangerousVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &rustls::pki_types::CertificateDer<'_>,
        _intermediates: &[rustls::pki_types::CertificateDer<'_>],
        _server_name: &rustls::pki_types::ServerName<'_>,
        _ocsp_response: &[u8],
        _now: rustls::pki_types::UnixTime,
    ) -> std::result::Result<rustls::client::danger::ServerCertVerified, rustls::Error> {
        Ok(rustls::client::danger::ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> std::result::Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> std::result::Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<rustls::SignatureScheme> {
        rustls::crypto::ring::default_provider()
            .signature_verification_algorithms
            .supported_schemes()
    }
}
