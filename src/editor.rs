use crate::curves::{CurveEngine, CurveMode, Representation};
use crate::geometry_utilities::types::CanvasPoint;
use crate::picking::PickResult;
use crate::polygon::BasePolygon;
use crate::subdivision::SubdivisionCounter;
use log::{debug, info};

/// Keys that select a curve representation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CurveKey {
    Subdivision,
    Bezier,
    CatmullRom,
}

/// Everything the user can change, owned in one place.
///
/// The curve engine only ever reads this, all mutation goes through the
/// transition methods below.
pub struct EditorState {
    polygon: BasePolygon,
    mode: CurveMode,
    subdivision: SubdivisionCounter,
    selection: Option<PickResult>,
    status: String,
}

impl EditorState {
    pub fn new(polygon: BasePolygon) -> Self {
        EditorState {
            polygon,
            mode: CurveMode::None,
            subdivision: SubdivisionCounter::default(),
            selection: None,
            status: String::new(),
        }
    }

    pub fn polygon(&self) -> &BasePolygon {
        &self.polygon
    }

    pub fn mode(&self) -> CurveMode {
        self.mode
    }

    pub fn subdivision_level(&self) -> usize {
        self.subdivision.level()
    }

    pub fn selection(&self) -> Option<PickResult> {
        self.selection
    }

    /// "background", "point <id>" or empty before the first pick.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Index of the selected vertex, if the last pick hit one that exists.
    pub fn selected_vertex(&self) -> Option<usize> {
        self.selection.and_then(|s| s.vertex_index(self.polygon.len()))
    }

    pub fn press_curve_key(&mut self, key: CurveKey) {
        let previous = self.mode;
        match key {
            CurveKey::Subdivision => {
                self.mode = CurveMode::Subdivision;
                let level = self.subdivision.advance();
                debug!("Subdivision level {}", level);
            }
            CurveKey::Bezier => {
                self.mode = CurveMode::Bezier;
                self.subdivision.reset();
            }
            CurveKey::CatmullRom => {
                self.mode = CurveMode::CatmullRom;
                self.subdivision.reset();
            }
        }
        if previous != self.mode {
            info!("Curve mode: {}", self.mode);
        }
    }

    /// Stores the outcome of a pick and updates the status string.
    pub fn resolve_pick(&mut self, pick: PickResult) {
        debug!("Picked {:?}", pick);
        self.selection = Some(pick);
        self.status = pick.to_string();
    }

    /// Forgets the selection after a failed pick. The status keeps the last successful pick.
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Moves the selected vertex to `point`. Returns false if nothing valid is selected.
    pub fn drag_to(&mut self, point: CanvasPoint) -> bool {
        match self.selected_vertex() {
            Some(index) => self.polygon.move_vertex(index, point),
            None => false,
        }
    }

    pub fn representation(&self, engine: &mut CurveEngine) -> Representation {
        engine.build(&self.polygon, self.mode, self.subdivision.level())
    }
}

impl Default for EditorState {
    fn default() -> Self {
        EditorState::new(BasePolygon::default())
    }
}
