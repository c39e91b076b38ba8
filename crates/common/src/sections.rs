//! # Scroll Sections
//!
//! Maps a vertical scroll offset onto the page sections and describes what
//! each section shows.

use bevy::math::Vec3;

/// Number of scrollable sections.
pub const SECTION_COUNT: u32 = 2;

/// A page section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Section {
    /// Particle galaxy with the tuning panel
    #[default]
    Galaxy,
    /// Clickable light bulb model
    Bulb,
}

impl Section {
    pub fn from_index(index: u32) -> Self {
        match index {
            0 => Section::Galaxy,
            _ => Section::Bulb,
        }
    }

    pub fn index(&self) -> u32 {
        match self {
            Section::Galaxy => 0,
            Section::Bulb => 1,
        }
    }

    pub fn galaxy_visible(&self) -> bool {
        *self == Section::Galaxy
    }

    pub fn model_visible(&self) -> bool {
        *self == Section::Bulb
    }

    pub fn panel_visible(&self) -> bool {
        *self == Section::Galaxy
    }

    /// Fixed camera placement for this section.
    pub fn camera_pose(&self) -> CameraPose {
        match self {
            Section::Galaxy => CameraPose::new(Vec3::new(0.0, 2.0, 5.0), Vec3::ZERO),
            Section::Bulb => CameraPose::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO),
        }
    }
}

/// Where the camera sits and what it looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
}

impl CameraPose {
    pub const fn new(position: Vec3, target: Vec3) -> Self {
        Self { position, target }
    }
}

/// Emitted when scrolling crosses into another section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionChange {
    pub from: Section,
    pub to: Section,
}

/// Scroll offset, viewport size and the section they select.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionTracker {
    scroll_y: f32,
    viewport_width: f32,
    viewport_height: f32,
    current: Section,
}

impl Default for SectionTracker {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

impl SectionTracker {
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            scroll_y: 0.0,
            viewport_width,
            viewport_height,
            current: Section::Galaxy,
        }
    }

    pub fn current(&self) -> Section {
        self.current
    }

    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    pub fn viewport(&self) -> (f32, f32) {
        (self.viewport_width, self.viewport_height)
    }

    /// Largest reachable scroll offset: the top of the last section.
    pub fn max_scroll(&self) -> f32 {
        (SECTION_COUNT - 1) as f32 * self.viewport_height.max(0.0)
    }

    /// Section index for an offset: integer division by the viewport height.
    pub fn section_at(&self, scroll_y: f32) -> Section {
        if self.viewport_height <= 0.0 {
            return Section::Galaxy;
        }
        let index = (scroll_y / self.viewport_height).floor().max(0.0) as u32;
        Section::from_index(index.min(SECTION_COUNT - 1))
    }

    /// Jump to an absolute offset.
    pub fn set_scroll(&mut self, scroll_y: f32) -> Option<SectionChange> {
        self.scroll_y = scroll_y.clamp(0.0, self.max_scroll());
        self.refresh()
    }

    /// Move by a relative offset, positive scrolls down the page.
    pub fn scroll_by(&mut self, delta: f32) -> Option<SectionChange> {
        self.set_scroll(self.scroll_y + delta)
    }

    /// Record a new viewport size and re-derive the section.
    ///
    /// A collapsed viewport (a minimized window reports 0x0) is ignored so
    /// the scroll offset and section survive until the window comes back.
    pub fn resize(&mut self, width: f32, height: f32) -> Option<SectionChange> {
        if height <= 0.0 {
            return None;
        }
        self.viewport_width = width;
        self.viewport_height = height;
        self.scroll_y = self.scroll_y.clamp(0.0, self.max_scroll());
        self.refresh()
    }

    fn refresh(&mut self) -> Option<SectionChange> {
        let next = self.section_at(self.scroll_y);
        if next == self.current {
            return None;
        }
        let change = SectionChange {
            from: self.current,
            to: next,
        };
        self.current = next;
        Some(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_by_integer_division() {
        let tracker = SectionTracker::new(800.0, 600.0);
        assert_eq!(tracker.section_at(0.0), Section::Galaxy);
        assert_eq!(tracker.section_at(599.9), Section::Galaxy);
        assert_eq!(tracker.section_at(600.0), Section::Bulb);
        assert_eq!(tracker.section_at(5_000.0), Section::Bulb);
    }

    #[test]
    fn test_change_reported_once() {
        let mut tracker = SectionTracker::new(800.0, 600.0);
        assert_eq!(tracker.scroll_by(300.0), None);
        assert_eq!(
            tracker.scroll_by(300.0),
            Some(SectionChange { from: Section::Galaxy, to: Section::Bulb })
        );
        assert_eq!(tracker.scroll_by(10.0), None);
        assert_eq!(
            tracker.set_scroll(0.0),
            Some(SectionChange { from: Section::Bulb, to: Section::Galaxy })
        );
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut tracker = SectionTracker::new(800.0, 600.0);
        tracker.scroll_by(-50.0);
        assert_eq!(tracker.scroll_y(), 0.0);
        tracker.scroll_by(10_000.0);
        assert_eq!(tracker.scroll_y(), 600.0);
    }

    #[test]
    fn test_resize_rederives_section() {
        let mut tracker = SectionTracker::new(800.0, 600.0);
        tracker.set_scroll(600.0);
        assert_eq!(tracker.current(), Section::Bulb);

        let change = tracker.resize(800.0, 1200.0);
        assert_eq!(change, Some(SectionChange { from: Section::Bulb, to: Section::Galaxy }));
        assert_eq!(tracker.viewport(), (800.0, 1200.0));
    }

    #[test]
    fn test_minimize_keeps_section() {
        let mut tracker = SectionTracker::new(800.0, 600.0);
        tracker.set_scroll(600.0);
        assert_eq!(tracker.current(), Section::Bulb);

        assert_eq!(tracker.resize(0.0, 0.0), None);
        assert_eq!(tracker.current(), Section::Bulb);
        assert_eq!(tracker.scroll_y(), 600.0);
        assert_eq!(tracker.viewport(), (800.0, 600.0));

        assert_eq!(tracker.resize(800.0, 600.0), None);
        assert_eq!(tracker.current(), Section::Bulb);
    }

    #[test]
    fn test_section_layout() {
        assert!(Section::Galaxy.galaxy_visible());
        assert!(!Section::Galaxy.model_visible());
        assert!(Section::Galaxy.panel_visible());
        assert!(Section::Bulb.model_visible());
        assert!(!Section::Bulb.panel_visible());
        assert_eq!(Section::Bulb.camera_pose().position, Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(Section::Galaxy.camera_pose().position, Vec3::new(0.0, 2.0, 5.0));
    }
}
