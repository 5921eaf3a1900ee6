use crate::{
    entities::sections,
    error::{ServiceError, Validator},
    services::contains_ci,
};
use log::info;
use models::filter::NumericFilter;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
    sea_query::Expr,
};

#[derive(Debug, Clone)]
pub struct NewSection {
    pub id: i32,
    pub name: String,
    pub active: bool,
}

/// Partial edit of a section; a different `id` rekeys it
#[derive(Debug, Clone, Default)]
pub struct SectionChanges {
    pub id: Option<i32>,
    pub name: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct SectionFilter {
    pub id: NumericFilter<i32>,
    pub name: Option<String>,
    pub active: Option<bool>,
}

impl Default for SectionFilter {
    fn default() -> Self {
        Self {
            id: NumericFilter::Any,
            name: None,
            active: None,
        }
    }
}

pub struct SectionService;

impl SectionService {
    pub async fn list(
        db: &DatabaseConnection,
        filter: &SectionFilter,
    ) -> Result<Vec<sections::Model>, ServiceError> {
        let mut condition = Condition::all();

        match filter.id {
            NumericFilter::Unmatchable => return Ok(vec![]),
            NumericFilter::Exact(id) => condition = condition.add(sections::Column::Id.eq(id)),
            NumericFilter::Any => {}
        }

        if let Some(name) = &filter.name {
            condition = condition.add(contains_ci(sections::Column::Name, name));
        }

        if let Some(active) = filter.active {
            condition = condition.add(sections::Column::Active.eq(active));
        }

        Ok(sections::Entity::find()
            .filter(condition)
            .order_by_asc(sections::Column::Id)
            .all(db)
            .await?)
    }

    pub async fn get(db: &DatabaseConnection, id: i32) -> Result<sections::Model, ServiceError> {
        sections::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Section", id))
    }

    pub async fn create(
        db: &DatabaseConnection,
        input: NewSection,
    ) -> Result<sections::Model, ServiceError> {
        let mut v = Validator::new();
        let name = v.required("name", &input.name);
        if input.id <= 0 {
            v.add("id", "Section id must be a positive number");
        }

        if !v.has("id") && sections::Entity::find_by_id(input.id).one(db).await?.is_some() {
            v.add("id", "A section with this id already exists");
        }
        if !v.has("name") && Self::name_taken(db, &name, None).await? {
            v.add("name", "A section with this name already exists");
        }
        v.finish()?;

        let section = sections::ActiveModel {
            id: Set(input.id),
            name: Set(name),
            active: Set(input.active),
        }
        .insert(db)
        .await
        .map_err(|e| ServiceError::conflict_on_unique(e, "Section already exists"))?;

        info!("Created section {} ({})", section.id, section.name);
        Ok(section)
    }

    /// Edits a section. When `changes.id` differs from `id` the primary key is
    /// rewritten in place and students and materials follow through the
    /// cascading foreign keys, all in one transaction.
    pub async fn update(
        db: &DatabaseConnection,
        id: i32,
        changes: SectionChanges,
    ) -> Result<sections::Model, ServiceError> {
        let txn = db.begin().await?;

        let existing = sections::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Section", id))?;

        let mut v = Validator::new();
        let name = match &changes.name {
            Some(name) => {
                let name = v.required("name", name);
                if !v.has("name") && Self::name_taken(&txn, &name, Some(id)).await? {
                    v.add("name", "A section with this name already exists");
                }
                name
            }
            None => existing.name.clone(),
        };

        let new_id = changes.id.unwrap_or(id);
        if new_id <= 0 {
            v.add("id", "Section id must be a positive number");
        } else if new_id != id && sections::Entity::find_by_id(new_id).one(&txn).await?.is_some() {
            v.add("id", "A section with this id already exists");
        }
        v.finish()?;

        if new_id != id {
            Self::rekey(&txn, id, new_id).await?;
        }

        let mut active: sections::ActiveModel = sections::Model {
            id: new_id,
            ..existing.clone()
        }
        .into();
        active.name = Set(name);
        active.active = Set(changes.active.unwrap_or(existing.active));
        let section = active
            .update(&txn)
            .await
            .map_err(|e| ServiceError::conflict_on_unique(e, "Section already exists"))?;

        txn.commit().await?;
        info!("Updated section {id} -> {}", section.id);
        Ok(section)
    }

    /// Rewrites a section's primary key in place
    async fn rekey<C: ConnectionTrait>(conn: &C, from: i32, to: i32) -> Result<(), ServiceError> {
        sections::Entity::update_many()
            .col_expr(sections::Column::Id, Expr::value(to))
            .filter(sections::Column::Id.eq(from))
            .exec(conn)
            .await
            .map_err(|e| ServiceError::conflict_on_unique(e, format!("Section {to} already exists")))?;

        info!("Rekeyed section {from} to {to}");
        Ok(())
    }

    /// Deletes a section together with its students
    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
        let result = sections::Entity::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Section", id));
        }

        info!("Deleted section {id}");
        Ok(())
    }

    async fn name_taken<C: ConnectionTrait>(
        conn: &C,
        name: &str,
        except: Option<i32>,
    ) -> Result<bool, ServiceError> {
        let mut query = sections::Entity::find().filter(sections::Column::Name.eq(name));
        if let Some(id) = except {
            query = query.filter(sections::Column::Id.ne(id));
        }
        Ok(query.one(conn).await?.is_some())
    }
}
