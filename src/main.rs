use app_lib::models::settings::AppSettings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = AppSettings::from_env()?;
    log::info!("starting with {:?}", settings);

    app_lib::run(settings).await
}
