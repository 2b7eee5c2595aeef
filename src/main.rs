use trip_events::*;

#[derive(clap::Args, Debug, Clone)]
struct AppConfig {
    #[clap(flatten)]
    event_hubs: EventHubsConfig,

    #[clap(flatten)]
    input: InputConfig,

    #[clap(flatten)]
    publish: PublishConfig,
}

#[async_main]
async fn main() -> Result<()> {
    let environment = Config::<AppConfig>::init("send-trip-events")?;
    let app = &environment.config.project;

    let records = InputSource::from(&app.input).load().await?;

    send_events(&app.event_hubs, &records, &PublishOptions::from(&app.publish)).await
}
