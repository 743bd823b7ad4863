use anyhow::Context;
use cafe_server::{Config, Server, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (dotenv, 日志)
    setup_environment()?;

    // 打印横幅
    print_banner();

    tracing::info!("☕ Cafe Server starting...");

    // 2. 加载并校验配置
    let config = Config::from_env();
    config.validate().context("Invalid configuration")?;

    if config.jwt.is_generated() {
        tracing::warn!("Using a generated JWT secret, tokens will not survive a restart");
    }

    // 3. 启动 HTTP 服务器 (初始化数据库与状态)
    let server = Server::new(config);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
