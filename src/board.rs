//! Hit-testing map for column drop zones and task cards.
//!
//! The rendering host registers the current layout (column bounds, card
//! bounds) after every render; the engine resolves drop zones and drag
//! targets against the latest registration. Column-to-status mapping is an
//! explicit table supplied at registration time, never inferred from id
//! strings.

use crate::geometry::Point;
use crate::types::TaskStatus;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }
}

/// A column container eligible to receive a dragged card.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnZone {
    pub id: String,
    pub status: TaskStatus,
    pub bounds: Rect,
}

/// A draggable card as laid out on screen, tagged with the column it
/// currently lives in.
#[derive(Debug, Clone, PartialEq)]
pub struct CardRegion {
    pub task_id: String,
    pub home: TaskStatus,
    pub bounds: Rect,
}

/// The fixed column table of the Join board.
pub fn standard_columns() -> [(&'static str, TaskStatus); 4] {
    [
        ("toDoColumn", TaskStatus::ToDo),
        ("inProgressColumn", TaskStatus::InProgress),
        ("awaitingFeedbackColumn", TaskStatus::AwaitingFeedback),
        ("doneColumn", TaskStatus::Done),
    ]
}

#[derive(Debug, Default, Clone)]
pub struct BoardMap {
    zones: Vec<ColumnZone>,
    cards: Vec<CardRegion>,
}

impl BoardMap {
    pub fn clear(&mut self) {
        self.zones.clear();
        self.cards.clear();
    }

    pub fn register_zone(&mut self, id: impl Into<String>, status: TaskStatus, bounds: Rect) {
        self.zones.push(ColumnZone {
            id: id.into(),
            status,
            bounds,
        });
    }

    pub fn register_card(&mut self, task_id: impl Into<String>, home: TaskStatus, bounds: Rect) {
        self.cards.push(CardRegion {
            task_id: task_id.into(),
            home,
            bounds,
        });
    }

    /// Topmost zone under `point`. Later registrations win, matching paint
    /// order.
    pub fn zone_at(&self, point: Point) -> Option<&ColumnZone> {
        self.zones.iter().rev().find(|zone| zone.bounds.contains(point))
    }

    pub fn card_at(&self, point: Point) -> Option<&CardRegion> {
        self.cards.iter().rev().find(|card| card.bounds.contains(point))
    }

    pub fn card(&self, task_id: &str) -> Option<&CardRegion> {
        self.cards.iter().find(|card| card.task_id == task_id)
    }

    /// Cards of one column in registration (visual) order.
    pub fn cards_in(&self, status: TaskStatus) -> impl Iterator<Item = &CardRegion> {
        self.cards.iter().filter(move |card| card.home == status)
    }

    /// The card rendered directly after `task_id` in its column, used to
    /// restore a cancelled touch drag to its exact original slot.
    pub fn next_sibling(&self, task_id: &str) -> Option<&CardRegion> {
        let home = self.card(task_id)?.home;
        let mut in_column = self.cards_in(home);
        in_column.find(|card| card.task_id == task_id)?;
        in_column.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> BoardMap {
        let mut map = BoardMap::default();
        let columns = standard_columns();
        for (index, (id, status)) in columns.into_iter().enumerate() {
            let x = index as f64 * 100.0;
            map.register_zone(id, status, Rect::new(x, 0.0, 100.0, 400.0));
        }
        map.register_card("t1", TaskStatus::ToDo, Rect::new(10.0, 10.0, 80.0, 40.0));
        map.register_card("t2", TaskStatus::ToDo, Rect::new(10.0, 60.0, 80.0, 40.0));
        map.register_card("t3", TaskStatus::Done, Rect::new(310.0, 10.0, 80.0, 40.0));
        map
    }

    #[test]
    fn zone_at_resolves_column_under_point() {
        let map = board();
        let zone = map.zone_at(Point::new(150.0, 200.0)).expect("zone");
        assert_eq!(zone.status, TaskStatus::InProgress);
        assert_eq!(zone.id, "inProgressColumn");
    }

    #[test]
    fn zone_at_misses_outside_all_columns() {
        let map = board();
        assert!(map.zone_at(Point::new(450.0, 10.0)).is_none());
        assert!(map.zone_at(Point::new(50.0, 500.0)).is_none());
    }

    #[test]
    fn overlapping_zones_prefer_latest_registration() {
        let mut map = BoardMap::default();
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        map.register_zone("toDoColumn", TaskStatus::ToDo, rect);
        map.register_zone("doneColumn", TaskStatus::Done, rect);
        let zone = map.zone_at(Point::new(50.0, 50.0)).expect("zone");
        assert_eq!(zone.status, TaskStatus::Done);
    }

    #[test]
    fn card_at_finds_card_and_its_home_column() {
        let map = board();
        let card = map.card_at(Point::new(20.0, 70.0)).expect("card");
        assert_eq!(card.task_id, "t2");
        assert_eq!(card.home, TaskStatus::ToDo);
        assert!(map.card_at(Point::new(20.0, 300.0)).is_none());
    }

    #[test]
    fn next_sibling_tracks_visual_order() {
        let map = board();
        assert_eq!(map.next_sibling("t1").map(|c| c.task_id.as_str()), Some("t2"));
        assert!(map.next_sibling("t2").is_none());
        assert!(map.next_sibling("t3").is_none());
        assert!(map.next_sibling("missing").is_none());
    }

    #[test]
    fn standard_columns_cover_every_status() {
        let columns = standard_columns();
        for status in TaskStatus::all() {
            assert!(columns.iter().any(|(_, s)| *s == status));
        }
    }
}
