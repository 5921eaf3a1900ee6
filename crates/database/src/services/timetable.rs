use crate::{
    entities::{lectures, materials},
    error::{ServiceError, Validator},
};
use log::{debug, info};
use models::timetable::{Day, Grid, TimeSlot, assign_colors};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use serde::Serialize;

/// Request to book a lecture; `id` set and positive means edit that lecture
#[derive(Debug, Clone)]
pub struct LecturePlacement {
    pub id: Option<i32>,
    pub material_id: i32,
    pub group: String,
    pub room: String,
    pub day: i16,
    pub time: i16,
}

/// One lecture as displayed in a timetable cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LectureEntry {
    pub lecture_id: i32,
    pub material_id: i32,
    pub material_code: String,
    pub material_name: String,
    pub group: String,
    pub room: String,
    pub color: &'static str,
}

pub struct TimetableService;

impl TimetableService {
    /// Books or moves a lecture.
    ///
    /// The (material, group, day, time) slot is checked up front so a double
    /// booking comes back as a `Conflict` rather than a storage error.
    pub async fn place_lecture(
        db: &DatabaseConnection,
        placement: LecturePlacement,
    ) -> Result<lectures::Model, ServiceError> {
        let mut v = Validator::new();
        let group = v.required("group", &placement.group);
        let room = v.required("room", &placement.room);
        let day = Day::try_from(placement.day).inspect_err(|e| v.add("day", e.to_string()));
        let time =
            TimeSlot::try_from(placement.time).inspect_err(|e| v.add("time", e.to_string()));
        v.finish()?;
        let (day, time) = (day?, time?);

        let material = materials::Entity::find_by_id(placement.material_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Material", placement.material_id))?;

        let editing = placement.id.filter(|id| *id > 0);

        let mut clash = lectures::Entity::find()
            .filter(lectures::Column::MaterialId.eq(material.id))
            .filter(lectures::Column::Group.eq(group.as_str()))
            .filter(lectures::Column::Day.eq(day))
            .filter(lectures::Column::Time.eq(time));
        if let Some(id) = editing {
            clash = clash.filter(lectures::Column::Id.ne(id));
        }
        let conflict_message = format!(
            "{} group {group} already has a lecture on {day} in slot {time}",
            material.code
        );
        if clash.one(db).await?.is_some() {
            debug!("Rejected double booking: {conflict_message}");
            return Err(ServiceError::Conflict(conflict_message));
        }

        let lecture = match editing {
            Some(id) => {
                let existing = lectures::Entity::find_by_id(id)
                    .one(db)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("Lecture", id))?;

                let mut active: lectures::ActiveModel = existing.into();
                active.material_id = Set(material.id);
                active.group = Set(group);
                active.room = Set(room);
                active.day = Set(day);
                active.time = Set(time);
                active.update(db).await
            }
            None => {
                lectures::ActiveModel {
                    material_id: Set(material.id),
                    group: Set(group),
                    room: Set(room),
                    day: Set(day),
                    time: Set(time),
                    ..Default::default()
                }
                .insert(db)
                .await
            }
        }
        .map_err(|e| ServiceError::conflict_on_unique(e, conflict_message))?;

        info!(
            "Placed lecture {} for {} on {} slot {}",
            lecture.id, material.code, lecture.day, lecture.time
        );
        Ok(lecture)
    }

    /// The weekly grid, optionally narrowed to one group
    pub async fn grid(
        db: &DatabaseConnection,
        group: Option<&str>,
    ) -> Result<Grid<LectureEntry>, ServiceError> {
        let mut query = lectures::Entity::find();
        if let Some(group) = group {
            query = query.filter(lectures::Column::Group.eq(group));
        }

        let rows: Vec<(lectures::Model, materials::Model)> = query
            .find_also_related(materials::Entity)
            .order_by_asc(lectures::Column::Day)
            .order_by_asc(lectures::Column::Time)
            .order_by_asc(lectures::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .filter_map(|(lecture, material)| material.map(|m| (lecture, m)))
            .collect();

        let colors = assign_colors(rows.iter().map(|(lecture, _)| lecture.material_id));

        Ok(rows
            .into_iter()
            .map(|(lecture, material)| {
                let entry = LectureEntry {
                    lecture_id: lecture.id,
                    material_id: material.id,
                    material_code: material.code,
                    material_name: material.name,
                    group: lecture.group,
                    room: lecture.room,
                    color: colors.get(&lecture.material_id).copied().unwrap_or_default(),
                };
                (lecture.day, lecture.time, entry)
            })
            .collect())
    }

    pub async fn remove(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
        let result = lectures::Entity::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Lecture", id));
        }

        info!("Removed lecture {id}");
        Ok(())
    }
}
