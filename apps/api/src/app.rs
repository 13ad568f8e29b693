use crate::{
    config::{Config, StoreBackend},
    error::Result,
    routes::{api_routes, form_routes},
    services::{
        DocumentRenderer, FormController, InMemoryPoseStore, KeywordExtractor, Lexicon,
        MongoPoseStore, PoseStore, RecommendationService, SmtpNotifier,
    },
};
use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use log::info;
use std::{net::TcpListener, sync::Arc};

pub struct Application {
    port: u16,
    host: String,
    config: Config,
}

impl Application {
    /// Create a new application instance
    pub fn new(config: &Config) -> Self {
        Self {
            port: config.port,
            host: config.host.clone(),
            config: config.clone(),
        }
    }

    /// Build and run the server
    pub async fn run(&self) -> Result<()> {
        let bind_address = format!("{}:{}", self.host, self.port);
        let listener = TcpListener::bind(&bind_address)?;
        info!("Starting server at http://{}", bind_address);

        self.run_with_listener(listener).await
    }

    /// Run the server with a specific TCP listener
    /// This is useful for testing where we want to use a random port
    pub async fn run_with_listener(&self, listener: TcpListener) -> Result<()> {
        let controller = web::Data::new(build_controller(&self.config).await?);

        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header();

            App::new()
                .wrap(cors)
                .wrap(Logger::default())
                .app_data(controller.clone())
                .service(api_routes())
                .configure(form_routes)
        })
        .listen(listener)?
        .run()
        .await?;

        Ok(())
    }
}

/// Wire the thesaurus, pose store, renderer and mailer from configuration.
pub async fn build_controller(config: &Config) -> Result<FormController> {
    let mut lexicon = Lexicon::builtin()?;
    if let Some(path) = &config.thesaurus_file {
        lexicon.extend(Lexicon::from_json_file(path)?);
    }
    let extractor = KeywordExtractor::new(Arc::new(lexicon));

    let store: Arc<dyn PoseStore> = match config.store_backend()? {
        StoreBackend::Mongo {
            uri,
            database,
            collection,
        } => Arc::new(
            MongoPoseStore::connect(&uri, &database, &collection, config.query_timeout()).await?,
        ),
        StoreBackend::File(path) => Arc::new(InMemoryPoseStore::from_json_file(&path)?),
    };

    let recommendations = RecommendationService::new(extractor, store);
    let mailer = Arc::new(SmtpNotifier::from_config(config));

    info!(
        "Mail relay {}:{} as {}",
        config.smtp_host,
        config.smtp_port,
        config.sender()
    );

    Ok(FormController::new(
        recommendations,
        DocumentRenderer::new(),
        mailer,
    ))
}
