// SPDX-License-Identifier: MPL-2.0
//! Quality level catalog and selection.
//!
//! The engine owns the `enabled` flag of every level; the catalog mirrors it
//! and computes the flags a selection requires. After any operation that
//! returns `true` (or `Ok`) the caller pushes [`QualityCatalog::enabled_flags`]
//! back to the engine.

use crate::application::port::engine::EngineQualityLevel;
use crate::domain::error::PlayerError;
use crate::domain::video::{QualityLevel, QualitySelection};

/// Mirror of the engine's quality levels plus the user's selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QualityCatalog {
    levels: Vec<QualityLevel>,
    selection: QualitySelection,
    active: Option<usize>,
    menu_open: bool,
}

impl QualityCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the catalog with the engine's current list.
    ///
    /// Levels are relabelled and sorted by descending height. A manual
    /// selection survives if its level is still present. Otherwise the
    /// selection is re-derived from the engine flags: all enabled means Auto,
    /// exactly one means Manual, and anything else is normalised to Auto.
    ///
    /// Returns `true` when the catalog's flags differ from the engine's and
    /// must be pushed back.
    pub fn refresh(&mut self, engine_levels: &[EngineQualityLevel]) -> bool {
        let mut levels: Vec<QualityLevel> = engine_levels
            .iter()
            .enumerate()
            .map(|(id, level)| QualityLevel::new(id, level.height, level.bitrate, level.enabled))
            .collect();
        levels.sort_by(|a, b| b.height_px.cmp(&a.height_px).then(a.id.cmp(&b.id)));
        self.levels = levels;

        if self.active.is_some_and(|id| id >= engine_levels.len()) {
            self.active = None;
        }

        self.selection = match self.selection {
            QualitySelection::Manual(id) if self.contains(id) => QualitySelection::Manual(id),
            _ => {
                let mut enabled = self.levels.iter().filter(|l| l.enabled);
                match (enabled.next(), enabled.next()) {
                    (Some(only), None) if self.levels.len() > 1 => {
                        QualitySelection::Manual(only.id)
                    }
                    _ => QualitySelection::Auto,
                }
            }
        };

        let selection = self.selection;
        let mut needs_sync = false;
        for level in &mut self.levels {
            let wanted = match selection {
                QualitySelection::Auto => true,
                QualitySelection::Manual(id) => level.id == id,
            };
            if level.enabled != wanted {
                level.enabled = wanted;
                needs_sync = true;
            }
        }
        if self.levels.len() <= 1 {
            self.menu_open = false;
        }
        needs_sync
    }

    /// Enables every level and lets the engine choose.
    pub fn select_auto(&mut self) {
        for level in &mut self.levels {
            level.enabled = true;
        }
        self.selection = QualitySelection::Auto;
        self.menu_open = false;
    }

    /// Enables only the level with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::StaleQualitySelection`] if the id is not in the
    /// catalog. The catalog is left unchanged.
    pub fn select_manual(&mut self, id: usize) -> Result<(), PlayerError> {
        if !self.contains(id) {
            return Err(PlayerError::StaleQualitySelection(id));
        }
        for level in &mut self.levels {
            level.enabled = level.id == id;
        }
        self.selection = QualitySelection::Manual(id);
        self.menu_open = false;
        Ok(())
    }

    /// `"Auto"` or the selected level's label.
    #[must_use]
    pub fn selection_label(&self) -> String {
        match self.selection {
            QualitySelection::Auto => "Auto".to_string(),
            QualitySelection::Manual(id) => self
                .level(id)
                .map_or_else(|| "Auto".to_string(), |l| l.label.clone()),
        }
    }

    /// The picker is only worth showing with more than one level.
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        self.levels.len() > 1
    }

    #[must_use]
    pub fn selection(&self) -> QualitySelection {
        self.selection
    }

    #[must_use]
    pub fn levels(&self) -> &[QualityLevel] {
        &self.levels
    }

    #[must_use]
    pub fn level(&self, id: usize) -> Option<&QualityLevel> {
        self.levels.iter().find(|l| l.id == id)
    }

    fn contains(&self, id: usize) -> bool {
        self.level(id).is_some()
    }

    /// `(engine index, enabled)` pairs to push to the engine.
    pub fn enabled_flags(&self) -> impl Iterator<Item = (usize, bool)> + '_ {
        self.levels.iter().map(|l| (l.id, l.enabled))
    }

    /// Records the rendition the engine reports as playing.
    pub fn set_active(&mut self, active: Option<usize>) {
        self.active = active.filter(|id| self.contains(*id));
    }

    /// The rendition currently playing, if the engine reported one.
    #[must_use]
    pub fn active_level(&self) -> Option<&QualityLevel> {
        self.active.and_then(|id| self.level(id))
    }

    // -------------------------------------------------------------------------
    // Menu
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    /// Opens or closes the picker. Stays closed when nothing is selectable.
    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open && self.is_selectable();
    }

    pub fn close_menu(&mut self) {
        self.menu_open = false;
    }

    /// Drops every level (on detach).
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_levels(levels: &[(u32, bool)]) -> Vec<EngineQualityLevel> {
        levels
            .iter()
            .map(|&(height, enabled)| EngineQualityLevel {
                height,
                bitrate: u64::from(height) * 3_000,
                enabled,
            })
            .collect()
    }

    #[test]
    fn refresh_sorts_descending_and_labels() {
        let mut catalog = QualityCatalog::new();
        let needs_sync = catalog.refresh(&engine_levels(&[(360, true), (1080, true), (720, true)]));

        assert!(!needs_sync);
        let labels: Vec<_> = catalog.levels().iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["1080p", "720p", "360p"]);
        let ids: Vec<_> = catalog.levels().iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 2, 0]);
        assert_eq!(catalog.selection(), QualitySelection::Auto);
    }

    #[test]
    fn refresh_derives_manual_from_single_enabled_level() {
        let mut catalog = QualityCatalog::new();
        catalog.refresh(&engine_levels(&[(360, false), (720, true), (1080, false)]));
        assert_eq!(catalog.selection(), QualitySelection::Manual(1));
        assert_eq!(catalog.selection_label(), "720p");
    }

    #[test]
    fn partial_subset_is_normalised_to_auto() {
        let mut catalog = QualityCatalog::new();
        let needs_sync = catalog.refresh(&engine_levels(&[(360, true), (720, true), (1080, false)]));
        assert!(needs_sync);
        assert_eq!(catalog.selection(), QualitySelection::Auto);
        assert!(catalog.enabled_flags().all(|(_, enabled)| enabled));
    }

    #[test]
    fn select_manual_enables_exactly_one() {
        let mut catalog = QualityCatalog::new();
        catalog.refresh(&engine_levels(&[(360, true), (720, true), (1080, true)]));
        catalog.select_manual(1).unwrap();

        let enabled: Vec<_> = catalog.enabled_flags().filter(|(_, e)| *e).collect();
        assert_eq!(enabled, vec![(1, true)]);
        assert_eq!(catalog.selection_label(), "720p");
    }

    #[test]
    fn select_auto_enables_all() {
        let mut catalog = QualityCatalog::new();
        catalog.refresh(&engine_levels(&[(360, true), (720, true)]));
        catalog.select_manual(0).unwrap();
        catalog.select_auto();

        assert!(catalog.enabled_flags().all(|(_, e)| e));
        assert_eq!(catalog.selection_label(), "Auto");
    }

    #[test]
    fn unknown_id_is_rejected_without_change() {
        let mut catalog = QualityCatalog::new();
        catalog.refresh(&engine_levels(&[(360, true), (720, true)]));
        let before = catalog.clone();

        assert_eq!(
            catalog.select_manual(7),
            Err(PlayerError::StaleQualitySelection(7))
        );
        assert_eq!(catalog, before);
    }

    #[test]
    fn manual_selection_survives_new_levels() {
        let mut catalog = QualityCatalog::new();
        catalog.refresh(&engine_levels(&[(360, true), (720, true)]));
        catalog.select_manual(0).unwrap();

        // Engine appends a level, enabled by default.
        let needs_sync = catalog.refresh(&engine_levels(&[(360, true), (720, false), (1080, true)]));
        assert!(needs_sync);
        assert_eq!(catalog.selection(), QualitySelection::Manual(0));
        let enabled: Vec<_> = catalog.enabled_flags().filter(|(_, e)| *e).map(|(id, _)| id).collect();
        assert_eq!(enabled, vec![0]);
    }

    #[test]
    fn single_level_is_not_selectable() {
        let mut catalog = QualityCatalog::new();
        catalog.refresh(&engine_levels(&[(720, true)]));
        assert!(!catalog.is_selectable());
        assert_eq!(catalog.selection(), QualitySelection::Auto);

        catalog.toggle_menu();
        assert!(!catalog.is_menu_open());
    }

    #[test]
    fn menu_closes_on_selection() {
        let mut catalog = QualityCatalog::new();
        catalog.refresh(&engine_levels(&[(360, true), (720, true)]));
        catalog.toggle_menu();
        assert!(catalog.is_menu_open());
        catalog.select_manual(1).unwrap();
        assert!(!catalog.is_menu_open());
    }

    #[test]
    fn active_level_is_tracked() {
        let mut catalog = QualityCatalog::new();
        catalog.refresh(&engine_levels(&[(360, true), (720, true)]));
        catalog.set_active(Some(1));
        assert_eq!(catalog.active_level().map(|l| l.height_px), Some(720));
        catalog.set_active(Some(9));
        assert!(catalog.active_level().is_none());
    }
}
