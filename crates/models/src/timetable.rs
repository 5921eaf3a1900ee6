use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter, Result as FmtResult},
};

#[cfg(feature = "database")]
use sea_orm::Value;

/// Error for day or slot numbers outside the weekly grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotError {
    Day(i16),
    Time(i16),
}

impl Display for SlotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Day(day) => write!(f, "day must be between 1 and {}, got {day}", Day::COUNT),
            Self::Time(time) => write!(
                f,
                "time slot must be between 0 and {}, got {time}",
                TimeSlot::COUNT - 1
            ),
        }
    }
}

impl std::error::Error for SlotError {}

/// A teaching day of the week, numbered 1 (Saturday) through 6 (Thursday)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub struct Day(i16);

impl Day {
    pub const COUNT: usize = 6;

    const NAMES: [&'static str; Self::COUNT] = [
        "Saturday",
        "Sunday",
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
    ];

    pub fn number(self) -> i16 {
        self.0
    }

    pub fn name(self) -> &'static str {
        Self::NAMES[self.index()]
    }

    /// Zero-based row in the grid
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    pub fn all() -> impl Iterator<Item = Day> {
        (1..=Self::COUNT as i16).map(Day)
    }
}

impl TryFrom<i16> for Day {
    type Error = SlotError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        if (1..=Self::COUNT as i16).contains(&value) {
            Ok(Day(value))
        } else {
            Err(SlotError::Day(value))
        }
    }
}

impl From<Day> for i16 {
    fn from(day: Day) -> Self {
        day.0
    }
}

impl Display for Day {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.name())
    }
}

/// One of the five lecture periods in a day, numbered from 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub struct TimeSlot(i16);

impl TimeSlot {
    pub const COUNT: usize = 5;

    pub fn number(self) -> i16 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn all() -> impl Iterator<Item = TimeSlot> {
        (0..Self::COUNT as i16).map(TimeSlot)
    }
}

impl TryFrom<i16> for TimeSlot {
    type Error = SlotError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        if (0..Self::COUNT as i16).contains(&value) {
            Ok(TimeSlot(value))
        } else {
            Err(SlotError::Time(value))
        }
    }
}

impl From<TimeSlot> for i16 {
    fn from(slot: TimeSlot) -> Self {
        slot.0
    }
}

impl Display for TimeSlot {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

/// Colors handed out to materials on the timetable, cycling when exhausted
pub const PALETTE: [&str; 8] = [
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f", "#edc948", "#b07aa1", "#ff9da7",
];

fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Maps each distinct material id to a palette color by its ascending position
pub fn assign_colors<I>(material_ids: I) -> BTreeMap<i32, &'static str>
where
    I: IntoIterator<Item = i32>,
{
    let mut colors: BTreeMap<i32, &'static str> =
        material_ids.into_iter().map(|id| (id, "")).collect();

    for (index, color) in colors.values_mut().enumerate() {
        *color = palette_color(index);
    }

    colors
}

/// A day × time-slot grid where every cell holds zero or more entries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid<T> {
    cells: Vec<Vec<Vec<T>>>,
}

impl<T> Default for Grid<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Grid<T> {
    pub fn new() -> Self {
        let cells = (0..Day::COUNT)
            .map(|_| (0..TimeSlot::COUNT).map(|_| Vec::new()).collect())
            .collect();
        Self { cells }
    }

    pub fn push(&mut self, day: Day, time: TimeSlot, entry: T) {
        self.cells[day.index()][time.index()].push(entry);
    }

    pub fn cell(&self, day: Day, time: TimeSlot) -> &[T] {
        &self.cells[day.index()][time.index()]
    }

    pub fn len(&self) -> usize {
        self.cells.iter().flatten().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rows of the grid, one per day, each holding one cell per slot
    pub fn rows(&self) -> impl Iterator<Item = (Day, &[Vec<T>])> {
        Day::all().zip(self.cells.iter().map(Vec::as_slice))
    }
}

impl<T> FromIterator<(Day, TimeSlot, T)> for Grid<T> {
    fn from_iter<I: IntoIterator<Item = (Day, TimeSlot, T)>>(iter: I) -> Self {
        let mut grid = Self::new();
        for (day, time, entry) in iter {
            grid.push(day, time, entry);
        }
        grid
    }
}

#[cfg(feature = "database")]
macro_rules! impl_small_int_value {
    ($ty:ident) => {
        impl sea_orm::sea_query::ValueType for $ty {
            fn try_from(v: Value) -> Result<Self, sea_orm::sea_query::ValueTypeErr> {
                match v {
                    Value::SmallInt(Some(n)) => {
                        <$ty as TryFrom<i16>>::try_from(n).map_err(|_| sea_orm::sea_query::ValueTypeErr)
                    }
                    _ => Err(sea_orm::sea_query::ValueTypeErr),
                }
            }

            fn type_name() -> String {
                stringify!($ty).to_string()
            }

            fn array_type() -> sea_orm::sea_query::ArrayType {
                sea_orm::sea_query::ArrayType::SmallInt
            }

            fn column_type() -> sea_orm::sea_query::ColumnType {
                sea_orm::sea_query::ColumnType::SmallInteger
            }
        }

        impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Value::SmallInt(Some(value.0))
            }
        }

        impl sea_orm::TryGetable for $ty {
            fn try_get_by<I: sea_orm::ColIdx>(
                res: &sea_orm::QueryResult,
                index: I,
            ) -> Result<Self, sea_orm::TryGetError> {
                let val: i16 = res.try_get_by(index)?;

                <$ty as TryFrom<i16>>::try_from(val).map_err(|e| {
                    sea_orm::TryGetError::DbErr(sea_orm::DbErr::Type(format!(
                        "Failed to read {}: {e}",
                        stringify!($ty)
                    )))
                })
            }
        }

        impl sea_orm::sea_query::Nullable for $ty {
            fn null() -> Value {
                Value::SmallInt(None)
            }
        }
    };
}

#[cfg(feature = "database")]
impl_small_int_value!(Day);
#[cfg(feature = "database")]
impl_small_int_value!(TimeSlot);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_day_bounds() {
        assert!(Day::try_from(0).is_err());
        assert_eq!(Day::try_from(1).unwrap().name(), "Saturday");
        assert_eq!(Day::try_from(6).unwrap().name(), "Thursday");
        assert_eq!(Day::try_from(7), Err(SlotError::Day(7)));
    }

    #[test]
    fn test_time_slot_bounds() {
        assert!(TimeSlot::try_from(-1).is_err());
        assert_eq!(TimeSlot::try_from(0).unwrap().index(), 0);
        assert_eq!(TimeSlot::try_from(4).unwrap().index(), 4);
        assert_eq!(TimeSlot::try_from(5), Err(SlotError::Time(5)));
    }

    #[test]
    fn test_day_deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<Day>("3").is_ok());
        assert!(serde_json::from_str::<Day>("9").is_err());
    }

    #[test]
    fn test_grid_places_entries() {
        let monday = Day::try_from(3).unwrap();
        let first = TimeSlot::try_from(0).unwrap();
        let last = TimeSlot::try_from(4).unwrap();

        let grid: Grid<&str> = [(monday, first, "a"), (monday, first, "b"), (monday, last, "c")]
            .into_iter()
            .collect();

        assert_eq!(grid.cell(monday, first), &["a", "b"]);
        assert_eq!(grid.cell(monday, last), &["c"]);
        assert_eq!(grid.len(), 3);
        assert!(!grid.is_empty());
        assert_eq!(grid.rows().count(), Day::COUNT);

        let empty: Grid<&str> = std::iter::empty().collect();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_assign_colors_cycles() {
        let colors = assign_colors([42, 7, 42, 100, 1, 2, 3, 4, 5, 6]);

        assert_eq!(colors.len(), 9);
        assert_eq!(colors[&1], PALETTE[0]);
        assert_eq!(colors[&7], PALETTE[6]);
        assert_eq!(colors[&42], PALETTE[7]);
        assert_eq!(colors[&100], PALETTE[0]);
        assert_eq!(palette_color(PALETTE.len() + 2), PALETTE[2]);
    }
}
