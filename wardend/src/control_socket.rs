use std::path::Path;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixListener;
use tracing::{error, info, warn};
use warden_control::Context;

/// Serves the control channel over a Unix domain socket (§6): each
/// connection is expected to write exactly one command byte and then read
/// back the response, empty for every command except `'3'`, whose response
/// is the connection-table CSV snapshot.
pub async fn serve(context: Arc<Context>, socket_path: &Path) -> color_eyre::Result<()> {
    if socket_path.exists() {
        std::fs::remove_file(socket_path)?;
    }
    let listener = UnixListener::bind(socket_path)?;
    info!(target: "wardend", path = %socket_path.display(), "control channel listening");

    loop {
        let (stream, _addr) = listener.accept().await?;
        let context = Arc::clone(&context);
        tokio::spawn(handle_connection(stream, context));
    }
}

async fn handle_connection(mut stream: tokio::net::UnixStream, context: Arc<Context>) {
    let mut buf = [0u8; 64];
    let n = match stream.read(&mut buf).await {
        Ok(n) => n,
        Err(error) => {
            warn!(target: "wardend", %error, "control connection read failed");
            return;
        }
    };

    match context.handle_command(&buf[..n]) {
        Ok(response) => {
            if !response.is_empty() {
                if let Err(error) = stream.write_all(&response).await {
                    warn!(target: "wardend", %error, "control connection write failed");
                }
            }
        }
        Err(error) => {
            error!(target: "wardend", %error, "control command failed");
            let _ = stream.write_all(error.to_string().as_bytes()).await;
        }
    }
}
