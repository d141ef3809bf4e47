//! Cell geometry: per-face measurements and the derived integer cell metrics.

/// Measurements of a loaded face at a fixed size, in pixels.
///
/// Vertical values follow the font-table sign convention: `ascent` is
/// positive above the baseline, `descent` is negative below it, and the
/// optional underline/strikethrough positions are offsets from the baseline
/// (negative below, positive above).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FaceMetrics {
    /// Widest advance of the printable ASCII range.
    pub cell_width: f32,
    pub ascent: f32,
    pub descent: f32,
    pub line_gap: f32,
    pub underline_position: Option<f32>,
    pub underline_thickness: Option<f32>,
    pub strikethrough_position: Option<f32>,
    pub strikethrough_thickness: Option<f32>,
    pub cap_height: Option<f32>,
    pub ex_height: Option<f32>,
}

impl FaceMetrics {
    pub fn line_height(&self) -> f32 {
        self.ascent - self.descent + self.line_gap
    }
}

/// Integer cell geometry published by a grid.
///
/// `cell_baseline` is measured up from the bottom of the cell; the line
/// positions are measured down from the top of the cell to the top of the
/// line. All values are clamped into the cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Metrics {
    pub cell_width: u32,
    pub cell_height: u32,
    pub cell_baseline: u32,
    pub underline_position: u32,
    pub underline_thickness: u32,
    pub strikethrough_position: u32,
    pub strikethrough_thickness: u32,
}

impl Metrics {
    /// Derives cell metrics from face measurements.
    ///
    /// Half of the line gap is distributed below the baseline. Faces that
    /// do not report underline or strikethrough geometry get a 1px line just
    /// below the baseline and a line centered at half the ex height.
    pub fn calc(face: &FaceMetrics) -> Metrics {
        let cell_width = face.cell_width.ceil().max(1.0) as u32;
        let cell_height = face.line_height().ceil().max(1.0) as u32;
        let cell_baseline = (-face.descent + face.line_gap / 2.0)
            .round()
            .clamp(0.0, cell_height as f32) as u32;
        let top_to_baseline = (cell_height - cell_baseline) as f32;

        let underline_thickness = face.underline_thickness.map_or(1, |t| t.round().max(1.0) as u32);
        let underline_offset = face
            .underline_position
            .unwrap_or(-(underline_thickness as f32));
        let underline_position = clamp_line(top_to_baseline - underline_offset, cell_height);

        let strikethrough_thickness = face
            .strikethrough_thickness
            .map_or(underline_thickness, |t| t.round().max(1.0) as u32);
        let strikethrough_offset = face
            .strikethrough_position
            .unwrap_or_else(|| face.ex_height.unwrap_or(face.ascent * 0.6) / 2.0);
        let strikethrough_position =
            clamp_line(top_to_baseline - strikethrough_offset, cell_height);

        Metrics {
            cell_width,
            cell_height,
            cell_baseline,
            underline_position,
            underline_thickness,
            strikethrough_position,
            strikethrough_thickness,
        }
    }

    /// Applies user metric modifiers in place.
    pub fn apply(&mut self, mods: &ModifierSet) {
        apply_one(&mut self.cell_width, mods.cell_width);
        apply_one(&mut self.cell_height, mods.cell_height);
        apply_one(&mut self.cell_baseline, mods.cell_baseline);
        apply_one(&mut self.underline_position, mods.underline_position);
        apply_one(&mut self.underline_thickness, mods.underline_thickness);
        apply_one(&mut self.strikethrough_position, mods.strikethrough_position);
        apply_one(&mut self.strikethrough_thickness, mods.strikethrough_thickness);

        self.cell_width = self.cell_width.max(1);
        self.cell_height = self.cell_height.max(1);
        self.underline_thickness = self.underline_thickness.max(1);
        self.strikethrough_thickness = self.strikethrough_thickness.max(1);
    }
}

fn clamp_line(position: f32, cell_height: u32) -> u32 {
    position.round().clamp(0.0, cell_height.saturating_sub(1) as f32) as u32
}

fn apply_one(value: &mut u32, modifier: Option<Modifier>) {
    if let Some(m) = modifier {
        *value = m.apply(*value);
    }
}

/// A single user metric adjustment: an absolute pixel delta or a percentage
/// scale where 100 leaves the value unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Modifier {
    Absolute(i32),
    Percent(f32),
}

impl Modifier {
    pub fn apply(self, value: u32) -> u32 {
        match self {
            Modifier::Absolute(delta) => (value as i64 + delta as i64).max(0) as u32,
            Modifier::Percent(pct) => ((value as f32) * pct / 100.0).round().max(0.0) as u32,
        }
    }
}

// Modifiers participate in the grid fingerprint, so hashing must be
// deterministic; percentages hash by bit pattern.
impl Eq for Modifier {}

impl std::hash::Hash for Modifier {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Modifier::Absolute(delta) => {
                state.write_u8(0);
                delta.hash(state);
            },
            Modifier::Percent(pct) => {
                state.write_u8(1);
                pct.to_bits().hash(state);
            },
        }
    }
}

/// The full set of user metric adjustments recognized by grid construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModifierSet {
    pub cell_width: Option<Modifier>,
    pub cell_height: Option<Modifier>,
    pub cell_baseline: Option<Modifier>,
    pub underline_position: Option<Modifier>,
    pub underline_thickness: Option<Modifier>,
    pub strikethrough_position: Option<Modifier>,
    pub strikethrough_thickness: Option<Modifier>,
}
