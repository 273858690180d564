use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use restaurant_review::config::Config;

mod api;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .with_ansi(true)
        .with_file(false)
        .pretty()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::from_env()?;
    let state = web::Data::new(api::ApiState::new(&config).await?);
    let origin = config.cors_origin.clone();

    tracing::info!(
        "serving city {} on {}:{}",
        config.city_id,
        config.bind_addr,
        config.port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(
                Cors::default()
                    .allowed_origin(&origin)
                    .allow_any_method()
                    .allow_any_header(),
            )
            .configure(api::routes)
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await?;
    Ok(())
}
