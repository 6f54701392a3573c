//! Application wiring.
//!
//! [`App`] owns one event bus and one store, and connects the pointer
//! router, the map synchronizer and the panel view models to them.

use aoimapper_core::{DrawingMode, EventBus, FeatureId, LatLon, Viewport};
use aoimapper_designer::{PointerEvent, PointerOutcome, PointerRouter};
use aoimapper_geocoding::{Geocoder, NominatimClient, NominatimConfig};
use aoimapper_settings::{Config, SettingsManager};
use aoimapper_store::{MapState, MapStore, StatePersistence};
use aoimapper_ui::{DrawingToolbar, LayerPanel, LayerPanelModel, MapControls, SearchBar};
use aoimapper_visualizer::{BaseTileLayer, ImageryLayer, MapView, RecordingMapView, Synchronizer};
use std::sync::Arc;
use std::time::Instant;

/// Store defaults taken from the viewport section.
pub fn default_state(config: &Config) -> MapState {
    MapState::with_viewport(
        config.viewport.default_center,
        i32::from(config.viewport.default_zoom),
    )
}

fn base_tile_layer(config: &Config) -> BaseTileLayer {
    BaseTileLayer {
        url_template: config.base_map.tile_url.clone(),
        attribution: config.base_map.attribution.clone(),
        max_zoom: config.base_map.max_zoom,
    }
}

fn imagery_layer(config: &Config) -> ImageryLayer {
    ImageryLayer {
        url: config.imagery.url.clone(),
        layer: config.imagery.layer.clone(),
        format: config.imagery.format.clone(),
        transparent: config.imagery.transparent,
        attribution: config.imagery.attribution.clone(),
    }
}

/// Nominatim client configured from the geocoding section.
pub fn nominatim_client(config: &Config) -> NominatimClient {
    NominatimClient::new(NominatimConfig {
        base_url: config.geocoding.base_url.clone(),
        user_agent: config.geocoding.user_agent.clone(),
        limit: config.geocoding.result_limit,
        timeout: config.geocoding.timeout(),
    })
}

/// The assembled application over a map view `M`.
pub struct App<M: MapView = RecordingMapView> {
    bus: Arc<EventBus>,
    store: MapStore,
    router: PointerRouter,
    sync: Synchronizer<M>,
    controls: MapControls,
    toolbar: DrawingToolbar,
    layers: LayerPanel,
    search: SearchBar,
}

impl<M: MapView> App<M> {
    /// Wire an app around an existing store. The router starts listening
    /// immediately; the map follows the store once [`mount`](Self::mount)
    /// is called.
    pub fn new(store: MapStore, view: M, config: &Config, geocoder: Arc<dyn Geocoder>) -> Self {
        let bus = Arc::clone(store.bus());
        let router = PointerRouter::new(Arc::clone(&bus));
        router.attach();
        let sync = Synchronizer::with_layers(
            view,
            base_tile_layer(config),
            imagery_layer(config),
            Arc::clone(&bus),
        );
        let search = SearchBar::new(
            geocoder,
            config.geocoding.debounce(),
            config.geocoding.min_query_length,
        );

        Self {
            bus,
            store,
            router,
            sync,
            controls: MapControls::new(),
            toolbar: DrawingToolbar::new(),
            layers: LayerPanel::new(),
            search,
        }
    }

    /// Persistent store in the settings directory and a Nominatim geocoder.
    pub fn from_settings(settings: &SettingsManager, view: M) -> Self {
        let config = settings.config();
        let bus = Arc::new(EventBus::new());
        let persistence = StatePersistence::new(settings.store_file());
        let store = MapStore::open(persistence, default_state(config), bus);
        let geocoder: Arc<dyn Geocoder> = Arc::new(nominatim_client(config));
        Self::new(store, view, config, geocoder)
    }

    pub fn mount(&self) {
        self.sync.mount(self.store.state());
    }

    pub fn unmount(&self) {
        self.sync.unmount();
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn store(&self) -> &MapStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut MapStore {
        &mut self.store
    }

    pub fn router(&self) -> &PointerRouter {
        &self.router
    }

    pub fn synchronizer(&self) -> &Synchronizer<M> {
        &self.sync
    }

    pub fn search(&self) -> &SearchBar {
        &self.search
    }

    pub fn controls_mut(&mut self) -> &mut MapControls {
        &mut self.controls
    }

    // Pointer input

    pub fn pointer(&mut self, event: PointerEvent) -> PointerOutcome {
        self.router.handle(&mut self.store, event)
    }

    pub fn click(&mut self, at: LatLon) -> PointerOutcome {
        self.pointer(PointerEvent::Primary(at))
    }

    pub fn context_click(&mut self, at: LatLon) -> PointerOutcome {
        self.pointer(PointerEvent::Secondary(at))
    }

    /// The map finished a user pan or zoom.
    pub fn map_viewport_changed(&mut self) {
        self.sync.map_viewport_changed(&mut self.store);
    }

    // Toolbar

    pub fn set_drawing_mode(&mut self, mode: DrawingMode) {
        self.store.set_drawing_mode(mode);
    }

    pub fn toggle_tool(&mut self, mode: DrawingMode) {
        self.toolbar.activate(&mut self.store, mode);
    }

    pub fn tool_active(&self, mode: DrawingMode) -> bool {
        self.toolbar.is_active(&self.store, mode)
    }

    // Map controls

    pub fn zoom_in(&mut self) {
        self.controls.zoom_in(&mut self.store);
    }

    pub fn zoom_out(&mut self) {
        self.controls.zoom_out(&mut self.store);
    }

    pub fn set_zoom(&mut self, zoom: i32) {
        self.store.set_zoom(zoom);
    }

    // Layer panel

    pub fn layer_panel(&self) -> LayerPanelModel {
        self.layers.model(&self.store)
    }

    pub fn toggle_base_layer(&mut self) {
        self.layers.toggle_base_layer(&mut self.store);
    }

    pub fn delete_feature(&mut self, id: &FeatureId) {
        self.layers.delete(&mut self.store, id);
    }

    pub fn clear_features(&mut self) {
        self.layers.clear_all(&mut self.store);
    }

    // Search

    pub fn search_input(&mut self, text: &str, now: Instant) {
        self.search.input(text, now);
    }

    pub fn poll_search(&mut self, now: Instant) -> bool {
        self.search.poll(now)
    }

    pub fn flush_search(&mut self) -> bool {
        self.search.flush()
    }

    pub fn select_result(&mut self, index: usize) -> Option<LatLon> {
        self.search.select(&mut self.store, index)
    }
}

impl App<RecordingMapView> {
    /// Simulate the user dragging the headless map to `viewport`.
    pub fn pan_to(&mut self, viewport: Viewport) {
        self.sync
            .with_view_mut(|view| view.user_moved_to(viewport));
        self.map_viewport_changed();
    }
}

impl<M: MapView> std::fmt::Debug for App<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("store", &self.store)
            .field("router", &self.router)
            .field("sync", &self.sync)
            .field("search", &self.search)
            .finish()
    }
}
