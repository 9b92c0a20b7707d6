//! The composition root: page services, the asset loader, the camera rig,
//! and the world, driven by host events and one `tick` per displayed frame.

use std::time::Duration;

use folio_assets::{AssetError, LoadEvent, LoadedAssetTable, ResourceLoader, Source};
use folio_common::{Subscription, Viewport};
use folio_input::PageEvent;
use folio_kernel::{Clock, ScrollTracker, SizeTracker, ThemeController};
use folio_render::Renderer;
use folio_scene::{CameraRig, CameraSettings, RaycastRegistry, Scene};

use crate::ConfigError;
use crate::context::{BuildContext, FrameContext};
use crate::label::{LabelSink, OverlayLabel};
use crate::theme::Palette;
use crate::world::{World, WorldSettings};

#[derive(Debug, Clone, PartialEq)]
pub struct ExperienceSettings {
    pub camera: CameraSettings,
    pub world: WorldSettings,
    pub palette: Palette,
    /// Build the debug perspective camera alongside the page camera.
    pub debug: bool,
    /// Initial color-scheme preference.
    pub prefers_dark: bool,
}

impl Default for ExperienceSettings {
    fn default() -> Self {
        Self {
            camera: CameraSettings::default(),
            world: WorldSettings::default(),
            palette: Palette::default(),
            debug: false,
            prefers_dark: false,
        }
    }
}

/// Where the asset load cycle stands, as shown to the visitor.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    Idle,
    Loading { loaded: usize, total: usize },
    Ready,
    Failed(String),
}

/// Services entities bind against, kept apart from the loader so a build
/// can borrow both.
struct Stage<L> {
    scene: Scene,
    raycast: RaycastRegistry,
    theme: ThemeController,
    scroll: ScrollTracker,
    sizes: SizeTracker,
    clock: Clock,
    rig: CameraRig,
    labels: L,
}

impl<L: LabelSink> Stage<L> {
    fn build_world(
        &mut self,
        assets: &LoadedAssetTable,
        settings: &ExperienceSettings,
    ) -> Result<World, ConfigError> {
        let mut ctx = BuildContext {
            assets,
            scene: &mut self.scene,
            raycast: &mut self.raycast,
            theme: &mut self.theme,
            scroll: &mut self.scroll,
            clock: &mut self.clock,
            viewport: self.sizes.viewport(),
            palette: settings.palette,
        };
        World::build(&mut ctx, &settings.world)
    }
}

pub struct Experience<R: Renderer, L: LabelSink = OverlayLabel> {
    settings: ExperienceSettings,
    stage: Stage<L>,
    loader: ResourceLoader,
    load_events: Subscription<LoadEvent>,
    status: LoadStatus,
    world: Option<World>,
    renderer: R,
}

impl<R: Renderer> Experience<R> {
    /// An experience whose hover label is kept for the host to draw.
    pub fn new(loader: ResourceLoader, renderer: R, viewport: Viewport, settings: ExperienceSettings) -> Self {
        Self::with_labels(loader, renderer, OverlayLabel::new(), viewport, settings)
    }

    /// Text of the hovered logo's name label.
    pub fn label(&self) -> Option<&str> {
        self.stage.labels.text()
    }
}

impl<R: Renderer, L: LabelSink> Experience<R, L> {
    pub fn with_labels(
        mut loader: ResourceLoader,
        renderer: R,
        labels: L,
        viewport: Viewport,
        settings: ExperienceSettings,
    ) -> Self {
        let sizes = SizeTracker::new(viewport.width, viewport.height, viewport.pixel_ratio);
        let viewport = sizes.viewport();
        let stage = Stage {
            scene: Scene::new(),
            raycast: RaycastRegistry::new(),
            theme: ThemeController::new(settings.prefers_dark),
            scroll: ScrollTracker::new(viewport.height),
            rig: CameraRig::new(settings.camera, viewport, settings.debug),
            sizes,
            clock: Clock::new(),
            labels,
        };
        Self {
            load_events: loader.on_event(),
            loader,
            stage,
            status: LoadStatus::Idle,
            world: None,
            renderer,
            settings,
        }
    }

    /// Start the asset load cycle. The world is built from the first tick
    /// that sees it finish successfully.
    pub fn load(&mut self, sources: Vec<Source>) -> Result<(), AssetError> {
        self.loader.load_resources(sources)
    }

    /// Build the world from assets resolved elsewhere, bypassing the loader.
    pub fn adopt_assets(&mut self, assets: &LoadedAssetTable) -> Result<(), ConfigError> {
        if self.world.is_none() {
            self.world = Some(self.stage.build_world(assets, &self.settings)?);
            self.status = LoadStatus::Ready;
        }
        Ok(())
    }

    pub fn settings(&self) -> &ExperienceSettings {
        &self.settings
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    pub fn world_mut(&mut self) -> Option<&mut World> {
        self.world.as_mut()
    }

    pub fn scene(&self) -> &Scene {
        &self.stage.scene
    }

    pub fn camera_rig(&self) -> &CameraRig {
        &self.stage.rig
    }

    pub fn camera_rig_mut(&mut self) -> &mut CameraRig {
        &mut self.stage.rig
    }

    pub fn theme(&self) -> &ThemeController {
        &self.stage.theme
    }

    pub fn raycast(&self) -> &RaycastRegistry {
        &self.stage.raycast
    }

    pub fn scroll(&self) -> &ScrollTracker {
        &self.stage.scroll
    }

    pub fn viewport(&self) -> Viewport {
        self.stage.sizes.viewport()
    }

    pub fn clock(&self) -> &Clock {
        &self.stage.clock
    }

    pub fn labels(&self) -> &L {
        &self.stage.labels
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Apply one host event. Resize and scroll take effect immediately.
    pub fn handle_event(&mut self, event: PageEvent) {
        tracing::debug!(kind = event.kind(), "page event");
        let stage = &mut self.stage;
        match event {
            PageEvent::Resized {
                width,
                height,
                pixel_ratio,
            } => {
                stage.sizes.resize(width, height, pixel_ratio);
                let viewport = stage.sizes.viewport();
                stage.rig.resize(viewport);
                stage.scroll.set_viewport_height(viewport.height);
                stage.rig.on_scroll(stage.scroll.scroll_top());
                if let Some(world) = self.world.as_mut() {
                    world.resize(&mut stage.scene, viewport);
                    world.sync_theme_override(stage.scroll.section(), &mut stage.theme);
                }
            }
            PageEvent::Scrolled { scroll_top } => {
                stage.scroll.set_scroll(scroll_top);
                stage.rig.on_scroll(scroll_top);
                if let Some(world) = self.world.as_mut() {
                    world.sync_theme_override(stage.scroll.section(), &mut stage.theme);
                }
            }
            PageEvent::PointerMoved { x, y } => stage.raycast.set_cursor(x, y),
            PageEvent::PointerClicked => {
                let events = stage.raycast.click();
                if let Some(world) = self.world.as_mut() {
                    world.handle_raycast(&events, &stage.scene, &mut stage.labels);
                }
            }
            PageEvent::VisibilityChanged { visible } => stage.clock.set_visible(visible),
            PageEvent::ColorSchemeChanged { prefers_dark } => stage.theme.on_color_scheme_changed(prefers_dark),
            PageEvent::ThemeToggled => stage.theme.request_change(),
        }
    }

    /// Advance one frame at host time `now`: camera, then world, then
    /// render, then raycast. Returns `None` while the page is hidden.
    pub fn tick(&mut self, now: Duration) -> Result<Option<R::Output>, ConfigError> {
        let _span = tracing::trace_span!("experience_tick").entered();
        self.poll_loader()?;
        let stage = &mut self.stage;
        if !stage.clock.is_visible() {
            return Ok(None);
        }

        let time = stage.clock.tick(now);
        stage.rig.update(time.delta);
        if let Some(world) = self.world.as_mut() {
            world.tick(&mut FrameContext {
                time,
                scene: &mut stage.scene,
                theme: &mut stage.theme,
                labels: &mut stage.labels,
            });
        }

        let viewport = stage.sizes.viewport();
        let output = self.renderer.render(&stage.scene, stage.rig.active(), viewport);
        let events = stage.raycast.dispatch(&stage.scene, stage.rig.active(), viewport);
        if let Some(world) = self.world.as_mut() {
            world.handle_raycast(&events, &stage.scene, &mut stage.labels);
        }
        Ok(Some(output))
    }

    fn poll_loader(&mut self) -> Result<(), ConfigError> {
        self.loader.poll();
        for event in self.load_events.drain() {
            match event {
                LoadEvent::Started { total } => self.status = LoadStatus::Loading { loaded: 0, total },
                LoadEvent::Progress { loaded, total, .. } => self.status = LoadStatus::Loading { loaded, total },
                LoadEvent::Finished { success: true } => {
                    if self.world.is_none() {
                        match self.stage.build_world(self.loader.assets(), &self.settings) {
                            Ok(world) => self.world = Some(world),
                            Err(err) => {
                                self.status = LoadStatus::Failed(err.to_string());
                                return Err(err);
                            }
                        }
                    }
                    self.status = LoadStatus::Ready;
                }
                LoadEvent::Finished { success: false } => {
                    let message = self.loader.last_error().unwrap_or("asset load failed").to_string();
                    tracing::error!(%message, "world will not be built");
                    self.status = LoadStatus::Failed(message);
                }
            }
        }
        Ok(())
    }
}
