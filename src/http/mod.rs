//! The HTTP server, handler and routes.
//!
//! This file itself contains fairly little business logic and just sets up the
//! `hyper` server and catches errors. The main logic is in `handlers.rs`.

use bytes::Bytes;
use hyper::{body::Incoming, service::service_fn};
use hyper_util::{
    rt::{TokioExecutor, TokioIo},
    server::{conn::auto, graceful::GracefulShutdown},
};
use std::{
    convert::Infallible,
    fs,
    future::Future,
    net::{IpAddr, SocketAddr},
    os::unix::fs::PermissionsExt,
    panic::AssertUnwindSafe,
    path::PathBuf,
    sync::Arc,
    time::Duration,
};
use futures::FutureExt;
use tokio::{
    io::{AsyncRead, AsyncWrite},
    net::{TcpListener, UnixListener},
};

use crate::{api, prelude::*};
use self::{handlers::handle, response::internal_server_error};


mod handlers;
mod log;
mod response;


/// HTTP server configuration.
#[derive(Debug, Clone, confique::Config)]
pub(crate) struct HttpConfig {
    /// The TCP port the HTTP server should listen on.
    #[config(default = 3080)]
    pub(crate) port: u16,

    /// The bind address to listen on.
    #[config(default = "127.0.0.1")]
    pub(crate) address: IpAddr,

    /// Unix domain socket to listen on. Specifying this will overwrite
    /// the TCP configuration. Example: "/tmp/folio.socket".
    pub(crate) unix_socket: Option<PathBuf>,

    /// Unix domain socket file permissions.
    #[config(default = 0o755)]
    pub(crate) unix_socket_permissions: u32,
}


type Body = http_body_util::Full<Bytes>;
type Response<T = Body> = hyper::Response<T>;
type Request<T = Incoming> = hyper::Request<T>;

/// How long in-flight connections may take to finish after Ctrl-C.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);


/// Context that the request handler has access to.
pub(crate) struct Context {
    pub(crate) api_root: api::RootNode,
    pub(crate) api: api::Context,

    /// Whether to log the headers of each request.
    pub(crate) log_headers: bool,
}


/// Starts the HTTP server and runs it until Ctrl-C is pressed. The future
/// returned by this function must be awaited to actually run it.
pub(crate) async fn serve(config: &HttpConfig, ctx: Context) -> Result<()> {
    let ctx = Arc::new(ctx);
    let builder = auto::Builder::new(TokioExecutor::new());
    let graceful = GracefulShutdown::new();
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    // The accept loop is the same for both kinds of listeners, but their
    // `accept` methods return different stream types. The macro avoids
    // duplicating the loop.
    macro_rules! accept_loop {
        ($listener:expr) => {
            loop {
                tokio::select! {
                    res = $listener.accept() => match res {
                        Ok((stream, _)) => serve_connection(stream, &builder, &graceful, &ctx),
                        Err(e) => warn!("Failed to accept connection: {e}"),
                    },
                    res = &mut shutdown => {
                        if let Err(e) = res {
                            error!("Failed to listen for Ctrl-C signal: {e}");
                        }
                        break;
                    }
                }
            }
        };
    }

    if let Some(unix_socket) = &config.unix_socket {
        // Bind to Unix domain socket.
        if unix_socket.exists() {
            fs::remove_file(unix_socket).with_context(|| format!(
                "failed to remove old socket file '{}'",
                unix_socket.display(),
            ))?;
        }
        let listener = UnixListener::bind(unix_socket)
            .with_context(|| format!("failed to bind to '{}'", unix_socket.display()))?;
        let permissions = fs::Permissions::from_mode(config.unix_socket_permissions);
        fs::set_permissions(unix_socket, permissions)
            .context("failed to set permissions of unix socket")?;
        info!("Listening on unix://{}", unix_socket.display());
        accept_loop!(listener);
    } else {
        // Bind to TCP socket.
        let addr = SocketAddr::new(config.address, config.port);
        let listener = TcpListener::bind(addr).await
            .with_context(|| format!("failed to bind to {addr}"))?;
        info!("Listening on http://{}", listener.local_addr()?);
        accept_loop!(listener);
    }

    info!("Received Ctrl-C, waiting for open connections to finish...");
    tokio::select! {
        _ = graceful.shutdown() => info!("All connections closed, shutting down"),
        _ = tokio::time::sleep(SHUTDOWN_TIMEOUT) => {
            warn!("Connections still open after {SHUTDOWN_TIMEOUT:?}, shutting down anyway");
        }
    }

    Ok(())
}

/// Spawns a task answering all requests arriving on `stream`.
fn serve_connection<S>(
    stream: S,
    builder: &auto::Builder<TokioExecutor>,
    graceful: &GracefulShutdown,
    ctx: &Arc<Context>,
)
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let ctx = Arc::clone(ctx);
    let service = service_fn(move |req: Request| {
        handle_internal_errors(handle(req, Arc::clone(&ctx)))
    });
    let conn = builder.serve_connection(TokioIo::new(stream), service).into_owned();
    let conn = graceful.watch(conn);

    tokio::spawn(async move {
        if let Err(e) = conn.await {
            debug!("Error serving connection: {e}");
        }
    });
}

/// This just wraps another future and catches all panics that might occur when
/// resolving/polling that given future. This ensures that we always answer with
/// `500` instead of just crashing the thread and closing the connection.
async fn handle_internal_errors(
    future: impl Future<Output = Response>,
) -> Result<Response, Infallible> {
    // What we are saying here is: "if the future panics, the remaining
    // application state is not broken". That holds as all shared state is
    // immutable.
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(response) => Ok(response),
        Err(panic) => {
            // For most panics (which use `panic!` like `println!`), the
            // payload is either `&str` or `String`.
            let msg = panic.downcast_ref::<String>()
                .map(|s| s.as_str())
                .or(panic.downcast_ref::<&str>().copied());

            match msg {
                Some(msg) => error!("INTERNAL SERVER ERROR: HTTP handler panicked: '{}'", msg),
                None => error!("INTERNAL SERVER ERROR: HTTP handler panicked"),
            }

            Ok(internal_server_error())
        }
    }
}
