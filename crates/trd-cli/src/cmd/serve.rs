use anyhow::anyhow;
use std::path::Path;

pub fn run(root: &Path, port: u16) -> anyhow::Result<()> {
    if !trd_core::workspace::is_initialized(root) {
        return Err(anyhow!("not initialized: run 'trd init' first"));
    }

    let rt = tokio::runtime::Runtime::new()?;
    let root_buf = root.to_path_buf();

    rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
        let actual_port = listener.local_addr()?.port();
        println!("TRD agent API on http://localhost:{actual_port}");

        tokio::select! {
            res = trd_server::serve_on(root_buf, listener) => res,
            _ = tokio::signal::ctrl_c() => Ok(()),
        }
    })
}
