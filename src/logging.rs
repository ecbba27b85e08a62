use crate::config::Environment;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_logging(env: &Environment) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // Per-environment defaults; the JWKS client's transport stays quiet
        // since it runs on every guarded request.
        match env {
            Environment::Dev => {
                "coffee_shop_api=debug,tower_http=debug,reqwest=info,hyper=info,info".into()
            }
            Environment::Staging => {
                "coffee_shop_api=debug,tower_http=info,reqwest=warn,hyper=warn,info".into()
            }
            Environment::Prod => {
                "coffee_shop_api=info,tower_http=info,reqwest=warn,hyper=warn,sqlx=warn,warn".into()
            }
        }
    });

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(env.is_dev())
        .with_line_number(env.is_dev());

    // JSON in production, pretty elsewhere
    if matches!(env, Environment::Prod) {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.pretty())
            .init();
    }

    tracing::info!("Logging initialized for {:?} environment", env);
}
