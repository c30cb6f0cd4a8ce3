//! Movie dashboard aggregation.

use serde::Serialize;

use crate::codes::{SceneType, SetLocation};

/// Number of scenes shown in the "longest scenes" panel.
pub const LONGEST_SCENES_LIMIT: i64 = 5;

/// Scene counts shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SceneTally {
    pub total: i64,
    pub set: i64,
    pub location: i64,
    pub montage: i64,
    pub dialogue: i64,
    pub action: i64,
    pub stunt: i64,
}

impl SceneTally {
    /// Count one scene given its raw set/location and type codes.
    ///
    /// Scenes shot on both set and location count toward neither bucket.
    pub fn record(&mut self, sl_flag: &str, scene_type: &str) {
        self.total += 1;
        match SetLocation::from_code(sl_flag) {
            Some(SetLocation::Set) => self.set += 1,
            Some(SetLocation::Location) => self.location += 1,
            _ => {}
        }
        match SceneType::from_code(scene_type) {
            Some(SceneType::Montage) => self.montage += 1,
            Some(SceneType::Dialogue) => self.dialogue += 1,
            Some(SceneType::Action) => self.action += 1,
            Some(SceneType::Stunt) => self.stunt += 1,
            _ => {}
        }
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for SceneTally {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut tally = SceneTally::default();
        for (sl_flag, scene_type) in iter {
            tally.record(sl_flag, scene_type);
        }
        tally
    }
}
