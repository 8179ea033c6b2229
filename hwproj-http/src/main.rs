use std::{net::SocketAddr, path::PathBuf, process::ExitCode};

use axum::{
    BoxError, Router,
    handler::HandlerWithoutStateExt,
    http::{Method, StatusCode, Uri, header},
    response::Redirect,
};
use axum_extra::extract::Host;
use axum_server::{Handle, tls_rustls::RustlsConfig};
use enviroment::{HttpSettings, HttpsSettings};
use hwproj_bridge::{
    Bridge, Config, Error,
    clap::Parser,
    settings::{build_config, build_file_path, command::Args},
};
use middleware::tower_trace;
use server::build_routes;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

mod enviroment;
mod error;
mod logging;
mod middleware;
mod server;
mod wrappers;

mod doc;
#[derive(Clone)]
struct Ports {
    http: String,
    https: String,
}

const TARGET_HTTP: &str = "Hwproj-Http";

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let mut file_path = args.file_path;
    if file_path.is_empty() {
        file_path = build_file_path();
    }

    let config = match build_config(args.env_config, &file_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let _logging = logging::init_logging(&config.logging);

    match run(config, HttpSettings::from_env()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(target: TARGET_HTTP, "{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config, settings: HttpSettings) -> Result<(), Error> {
    let bridge = Bridge::build(config, None).await?;
    let token = bridge.token().clone();

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(Any);

    let routes = tower_trace(build_routes(bridge, settings.doc)).layer(cors);

    let listener_http = TcpListener::bind(&settings.http_address)
        .await
        .map_err(|e| {
            Error::Server(format!(
                "Can not bind {}: {}",
                settings.http_address, e
            ))
        })?;

    match settings.https {
        Some(https) => {
            serve_https(https, listener_http, routes, token).await
        }
        None => serve_http(listener_http, routes, token).await,
    }
}

async fn serve_http(
    listener: TcpListener,
    routes: Router,
    token: CancellationToken,
) -> Result<(), Error> {
    info!(
        target: TARGET_HTTP,
        "Listening on http://{}",
        listener
            .local_addr()
            .map(|x| x.to_string())
            .unwrap_or_default()
    );

    axum::serve(
        listener,
        routes.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move { token.cancelled().await })
    .await
    .map_err(|e| Error::Server(e.to_string()))
}

async fn serve_https(
    settings: HttpsSettings,
    listener_http: TcpListener,
    routes: Router,
    token: CancellationToken,
) -> Result<(), Error> {
    let https_address = settings
        .address
        .parse::<SocketAddr>()
        .map_err(|e| Error::Server(format!("Invalid https address: {}", e)))?;

    tokio::spawn(redirect_http_to_https(https_address.port(), listener_http));

    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| {
            Error::Server("Can not install rustls crypto provider".to_owned())
        })?;

    let tls = RustlsConfig::from_pem_file(
        PathBuf::from(&settings.cert),
        PathBuf::from(&settings.private_key),
    )
    .await
    .map_err(|e| Error::Server(format!("Invalid certificate: {}", e)))?;

    let handle = Handle::new();

    let handle_clone = handle.clone();
    tokio::spawn(async move {
        token.cancelled().await;
        handle.graceful_shutdown(None);
    });

    info!(target: TARGET_HTTP, "Listening on https://{}", https_address);

    axum_server::bind_rustls(https_address, tls)
        .handle(handle_clone)
        .serve(routes.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .map_err(|e| Error::Server(e.to_string()))
}

async fn redirect_http_to_https(https: u16, listener_http: TcpListener) {
    fn make_https(
        host: String,
        uri: Uri,
        ports: Ports,
    ) -> Result<Uri, BoxError> {
        let mut parts = uri.into_parts();

        parts.scheme = Some(axum::http::uri::Scheme::HTTPS);

        if parts.path_and_query.is_none() {
            parts.path_and_query = Some("/".parse()?);
        }

        let https_host =
            host.replace(&ports.http.to_string(), &ports.https.to_string());
        parts.authority = Some(https_host.parse()?);

        Ok(Uri::from_parts(parts)?)
    }

    let http = match listener_http.local_addr() {
        Ok(addr) => addr.port().to_string(),
        Err(e) => {
            error!(target: TARGET_HTTP, "Redirect listener has no address: {}", e);
            return;
        }
    };
    let ports = Ports {
        https: https.to_string(),
        http,
    };

    let redirect = move |Host(host): Host, uri: Uri| async move {
        match make_https(host, uri, ports) {
            Ok(uri) => Ok(Redirect::permanent(&uri.to_string())),
            Err(error) => {
                warn!(%error, "failed to convert URI to HTTPS");
                Err(StatusCode::BAD_REQUEST)
            }
        }
    };

    if let Err(e) =
        axum::serve(listener_http, redirect.into_make_service()).await
    {
        error!(target: TARGET_HTTP, "Redirect server stopped: {}", e);
    }
}
