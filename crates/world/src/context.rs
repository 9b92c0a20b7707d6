use folio_assets::LoadedAssetTable;
use folio_common::Viewport;
use folio_kernel::{Clock, FrameTime, ScrollTracker, ThemeController};
use folio_scene::{RaycastRegistry, Scene};

use crate::label::LabelSink;
use crate::theme::Palette;

/// Everything an entity may touch while binding itself after a successful load.
pub struct BuildContext<'a> {
    pub assets: &'a LoadedAssetTable,
    pub scene: &'a mut Scene,
    pub raycast: &'a mut RaycastRegistry,
    pub theme: &'a mut ThemeController,
    pub scroll: &'a mut ScrollTracker,
    pub clock: &'a mut Clock,
    pub viewport: Viewport,
    pub palette: Palette,
}

/// Per-frame state handed to every entity's `tick`.
pub struct FrameContext<'a> {
    pub time: FrameTime,
    pub scene: &'a mut Scene,
    pub theme: &'a mut ThemeController,
    pub labels: &'a mut dyn LabelSink,
}
