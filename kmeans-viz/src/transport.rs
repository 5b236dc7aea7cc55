//! Newline-delimited JSON transport over TCP or stdio.
//!
//! Each request is one JSON object on its own line; each answer is one JSON
//! object on its own line, in request order per connection.

use std::sync::Arc;

use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader},
    net::TcpListener,
};
use tracing::{debug, info, warn};

use crate::{error::VizResult, handlers::Handlers};

/// Answer every line of `reader` on `writer` until end of input.
pub async fn serve_lines<R, W>(handlers: &Handlers, reader: R, mut writer: W) -> VizResult<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        debug!(bytes = line.len(), "Received request");

        let response = handlers.handle_line(&line).await;
        let mut payload = serde_json::to_string(&response)?;
        payload.push('\n');
        writer.write_all(payload.as_bytes()).await?;
        writer.flush().await?;
    }
    Ok(())
}

/// Accept connections forever, one task per connection.
pub async fn serve_tcp(listener: TcpListener, handlers: Arc<Handlers>) -> VizResult<()> {
    info!(addr = ?listener.local_addr()?, "Server ready, waiting for connections");
    loop {
        let (stream, peer) = listener.accept().await?;
        debug!(%peer, "connection opened");
        let handlers = Arc::clone(&handlers);
        tokio::spawn(async move {
            let (read, write) = stream.into_split();
            match serve_lines(&handlers, BufReader::new(read), write).await {
                Ok(()) => debug!(%peer, "connection closed"),
                Err(e) => warn!(%peer, "connection closed with error: {}", e),
            }
        });
    }
}

/// Serve a single client on stdin/stdout.
pub async fn serve_stdio(handlers: &Handlers) -> VizResult<()> {
    info!("Server ready, reading requests from stdin");
    serve_lines(handlers, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;
    info!("stdin closed, shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::Value;
    use tokio::{io::AsyncReadExt, net::TcpStream};

    use super::*;
    use crate::context::VizContext;

    fn handlers() -> Handlers {
        Handlers::new(VizContext { seed: Some(3), ..VizContext::default() })
    }

    #[tokio::test]
    async fn answers_each_line_in_order() {
        let input = concat!(
            r#"{"op":"generate_dataset","n_points":5}"#, "\n",
            "\n",
            r#"not json"#, "\n",
            r#"{"op":"reset_kmeans"}"#, "\n",
        );
        let mut output: Vec<u8> = Vec::new();
        serve_lines(&handlers(), input.as_bytes(), &mut output).await.unwrap();

        let answers: Vec<Value> = String::from_utf8(output).unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(answers.len(), 3);
        assert_eq!(answers[0]["data"].as_array().unwrap().len(), 5);
        assert_eq!(answers[1]["error"]["kind"], "bad_request");
        assert_eq!(answers[2]["status"], "Reset successful");
    }

    #[tokio::test]
    async fn duplex_round_trip() {
        let (client, server) = tokio::io::duplex(64 * 1024);
        let handlers = Arc::new(handlers());
        let server_handlers = Arc::clone(&handlers);
        let task = tokio::spawn(async move {
            let (read, write) = tokio::io::split(server);
            serve_lines(&server_handlers, BufReader::new(read), write).await
        });

        let (mut client_read, mut client_write) = tokio::io::split(client);
        let request = r#"{"op":"run_kmeans","data":[[0,0],[0,1],[9,9],[9,10]],"n_clusters":2,"init_method":"farthest"}"#;
        client_write.write_all(format!("{}\n", request).as_bytes()).await.unwrap();
        client_write.shutdown().await.unwrap();

        let mut raw = String::new();
        client_read.read_to_string(&mut raw).await.unwrap();
        task.await.unwrap().unwrap();

        let answer: Value = serde_json::from_str(raw.trim()).unwrap();
        assert_eq!(answer["centers"].as_array().unwrap().len(), 2);
        assert_eq!(answer["converged"], true);
    }

    #[tokio::test]
    async fn tcp_round_trip() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(serve_tcp(listener, Arc::new(handlers())));

        let stream = TcpStream::connect(addr).await.unwrap();
        let (read, mut write) = stream.into_split();
        write.write_all(b"{\"op\":\"reset_kmeans\"}\n").await.unwrap();

        let mut lines = BufReader::new(read).lines();
        let line = lines.next_line().await.unwrap().unwrap();
        let answer: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(answer["status"], "Reset successful");
    }
}
