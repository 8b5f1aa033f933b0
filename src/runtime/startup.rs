use std::env;
use std::sync::Arc;

use log::warn;

use crate::audio::RodioTransport;
use crate::backend::{BackendClient, Endpoints, TokenStore};
use crate::config;
use crate::playlist::PlaylistController;

pub type Controller = PlaylistController<RodioTransport>;

/// Build the backend client, restoring any saved session.
pub fn build_client(settings: &config::Settings) -> Arc<BackendClient> {
    let endpoints = Endpoints::new(&settings.server.base_url);
    let store = settings.credentials_path().map(TokenStore::new);
    if store.is_none() {
        warn!("no state directory; the session will not be saved");
    }
    Arc::new(BackendClient::new(endpoints, settings.client_options(), store))
}

/// Log in with `ASTRAL_USERNAME`/`ASTRAL_PASSWORD` when both are set.
pub fn login_from_env(client: &BackendClient) {
    let (Ok(username), Ok(password)) = (env::var("ASTRAL_USERNAME"), env::var("ASTRAL_PASSWORD")) else {
        return;
    };
    if let Err(err) = client.login(&username, &password) {
        warn!("login as {username} failed: {err}");
    }
}

/// Create the one controller of the session with the configured defaults.
pub fn build_controller(client: &Arc<BackendClient>, settings: &config::Settings) -> Controller {
    let transport = RodioTransport::new(Arc::clone(client));
    let mut controller = PlaylistController::new(transport, client.endpoints().clone());

    controller.set_repeat(settings.playback.repeat.into());
    controller.set_shuffle(settings.playback.shuffle);
    controller.set_volume(settings.playback.volume);

    controller
}
