//! Native runtime
//!
//! Everything that lives between `nativeOnCreate` and `nativeOnDestroy`:
//! the engine thread, the service dispatcher thread and the sending half
//! of the host channel. JNI callbacks carry no context pointer, so the
//! running instance sits in a process-wide slot.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use tunnel_core::{
    host_channel, ConfigError, CookedEvent, CoreConfig, EngineCommand, GraphicsApi, HostSender,
    InputNormalizer, NativeEngine, PlatformServices, SceneManager,
};
use tunnel_platform::{reports, BridgeError, PlatformBridge};
use tunnel_sdk::{NativeWindow, RawInputEvent};

use crate::scenes::WelcomeScene;

/// How long `surfaceDestroyed` waits for the engine to let go of the window
pub const WINDOW_RELEASE_TIMEOUT: Duration = Duration::from_secs(2);

/// How long a Back press waits for the current scene's verdict
pub const BACK_REPLY_TIMEOUT: Duration = Duration::from_millis(500);

static RUNTIME: Mutex<Option<Runtime>> = Mutex::new(None);

/// Error type for runtime startup
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("Runtime already started")]
    AlreadyStarted,

    #[error("Failed to spawn {name} thread: {source}")]
    Spawn {
        name: &'static str,
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

/// Threads and channels of a running game
pub struct Runtime {
    host: HostSender,
    services: PlatformServices,
    normalizer: InputNormalizer,
    window: Option<NativeWindow>,
    engine: Option<JoinHandle<()>>,
    dispatcher: Option<JoinHandle<()>>,
}

impl Runtime {
    /// Spawn the service dispatcher and the engine thread
    ///
    /// # Arguments
    /// * `bridge` - Host calls
    /// * `config` - Loaded core config
    /// * `make_graphics` - Builds the graphics backend on the engine thread
    pub fn launch<G, F>(
        bridge: Arc<dyn PlatformBridge>,
        config: CoreConfig,
        make_graphics: F,
    ) -> Result<Self, RuntimeError>
    where
        G: GraphicsApi + 'static,
        F: FnOnce() -> G + Send + 'static,
    {
        let (services, dispatcher) = PlatformServices::connect(
            bridge,
            Arc::clone(reports()),
            config.queues.service_requests,
        );
        let dispatcher = dispatcher.spawn().map_err(|source| RuntimeError::Spawn {
            name: "tunnel-services",
            source,
        })?;

        let (host, receiver) = host_channel(config.queues.host_events);
        let normalizer = InputNormalizer::new(&config.input);

        let engine_services = services.clone();
        let engine = std::thread::Builder::new()
            .name("tunnel-engine".into())
            .spawn(move || {
                let scenes =
                    SceneManager::with_scene(engine_services, Box::new(WelcomeScene::new()));
                let mut engine = NativeEngine::new(make_graphics(), scenes, receiver, &config);
                if let Err(e) = engine.game_loop() {
                    error!("Engine stopped: {}", e);
                    std::process::abort();
                }
            })
            .map_err(|source| RuntimeError::Spawn {
                name: "tunnel-engine",
                source,
            })?;

        info!("Runtime started");
        Ok(Self {
            host,
            services,
            normalizer,
            window: None,
            engine: Some(engine),
            dispatcher: Some(dispatcher),
        })
    }

    pub fn services(&self) -> &PlatformServices {
        &self.services
    }

    /// Forward a raw `APP_CMD_*` code
    pub fn send_command(&self, raw: i32) {
        match EngineCommand::from_raw(raw, None) {
            Some(command) => {
                self.host.send_command(command);
            }
            None => debug!("Ignoring host command {}", raw),
        }
    }

    /// Hand a new window to the engine
    ///
    /// A window still held from an earlier `surfaceCreated` is detached from
    /// the engine first if it is a different window.
    ///
    /// # Returns
    /// The earlier window reference, now safe to release
    pub fn window_created(&mut self, window: NativeWindow) -> Option<NativeWindow> {
        let stale = self.window.take();
        if stale.is_some_and(|old| old != window) {
            self.detach_window();
        }
        self.window = Some(window);
        self.host.send_command(EngineCommand::WindowCreated(window));
        stale
    }

    /// Tell the engine the window is going away and wait until it has let go
    ///
    /// # Returns
    /// The window, now safe to release
    pub fn window_destroyed(&mut self) -> Option<NativeWindow> {
        self.detach_window();
        self.window.take()
    }

    fn detach_window(&self) {
        self.host.send_command(EngineCommand::WindowDestroyed);
        if !self.host.barrier(WINDOW_RELEASE_TIMEOUT) {
            warn!(
                "Engine did not release the window within {}ms",
                WINDOW_RELEASE_TIMEOUT.as_millis()
            );
        }
    }

    /// Cook a raw event and queue it for the engine
    ///
    /// Back waits for the current scene: when the scene leaves it alone the
    /// host gets `false` and finishes the activity.
    ///
    /// # Returns
    /// `true` if the event was recognized and queued, or for Back, if the
    /// current scene consumed it
    pub fn cook_input(&self, event: &RawInputEvent) -> bool {
        self.normalizer.cook(event, &self.services, |cooked| match cooked {
            CookedEvent::Back => self
                .host
                .query_input(cooked, BACK_REPLY_TIMEOUT)
                .unwrap_or(false),
            _ => self.host.post_input(cooked),
        })
    }

    /// Stop the engine and the dispatcher and wait for both
    ///
    /// # Returns
    /// The window, if the host never destroyed it
    pub fn stop(mut self) -> Option<NativeWindow> {
        self.host.send_command(EngineCommand::Destroy);
        if let Some(engine) = self.engine.take() {
            if engine.join().is_err() {
                error!("Engine thread panicked");
            }
        }

        // The dispatcher ends once every queue handle is gone
        let Self {
            host,
            services,
            window,
            dispatcher,
            ..
        } = self;
        drop(host);
        drop(services);
        if let Some(dispatcher) = dispatcher {
            if dispatcher.join().is_err() {
                error!("Service dispatcher panicked");
            }
        }

        info!("Runtime stopped");
        window
    }
}

/// Install the fmt subscriber once
///
/// `RUST_LOG` overrides the level picked from `debug`.
pub fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .try_init();
}

/// Load the core config from the host's files directory
///
/// A missing entrypoint panics like every other integration error.
pub fn load_config(bridge: &dyn PlatformBridge) -> Result<CoreConfig, RuntimeError> {
    let files_dir = match bridge.files_dir() {
        Ok(dir) => dir,
        Err(e) if e.is_integration_error() => panic!("{}", e),
        Err(e) => return Err(e.into()),
    };
    Ok(CoreConfig::load(&files_dir)?)
}

/// Start the process-wide runtime
#[tracing::instrument(skip_all)]
pub fn start<G, F>(bridge: Arc<dyn PlatformBridge>, make_graphics: F) -> Result<(), RuntimeError>
where
    G: GraphicsApi + 'static,
    F: FnOnce() -> G + Send + 'static,
{
    let mut slot = RUNTIME.lock();
    if slot.is_some() {
        return Err(RuntimeError::AlreadyStarted);
    }

    let loaded = load_config(&*bridge);
    init_logging(loaded.as_ref().map(|config| config.debug).unwrap_or(false));
    let config = loaded.unwrap_or_else(|e| {
        warn!("Using default config: {}", e);
        CoreConfig::default()
    });

    *slot = Some(Runtime::launch(bridge, config, make_graphics)?);
    Ok(())
}

/// Run `f` against the process-wide runtime
///
/// # Returns
/// `None` if the runtime is not running
pub fn with_runtime<T>(f: impl FnOnce(&mut Runtime) -> T) -> Option<T> {
    let mut slot = RUNTIME.lock();
    match slot.as_mut() {
        Some(runtime) => Some(f(runtime)),
        None => {
            warn!("Native runtime is not running");
            None
        }
    }
}

pub fn is_running() -> bool {
    RUNTIME.lock().is_some()
}

/// Stop the process-wide runtime
///
/// # Returns
/// The window, if the host never destroyed it
pub fn shutdown() -> Option<NativeWindow> {
    let runtime = RUNTIME.lock().take()?;
    info!("Tunnel shutting down...");
    runtime.stop()
}
