use sea_orm::sea_query::{Alias, Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::info;

use crate::entities::{jutsus, prelude::*};
use crate::models::{Category, Element, Jutsu, JutsuDraft, JutsuFilter, Ordering, Page, Rank};

/// Maps the rank tag to its declaration-order position so SQL ordering
/// follows E,D,C,B,A,S,SS instead of string collation.
const RANK_ORDER_SQL: &str = "CASE \"rank\" \
    WHEN 'E' THEN 0 WHEN 'D' THEN 1 WHEN 'C' THEN 2 WHEN 'B' THEN 3 \
    WHEN 'A' THEN 4 WHEN 'S' THEN 5 WHEN 'SS' THEN 6 ELSE 7 END";

pub struct JutsuRepository {
    conn: DatabaseConnection,
}

impl JutsuRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: jutsus::Model) -> Jutsu {
        Jutsu {
            id: model.id,
            name: model.name,
            description: model.description,
            element: Element::from_tag(&model.element).unwrap_or_default(),
            category: Category::from_tag(&model.category).unwrap_or_default(),
            rank: Rank::from_tag(&model.rank).unwrap_or_default(),
            image: model.image,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }

    /// Inserts a new record. The unique constraint on `name` arbitrates
    /// concurrent creates; the caller maps the violation to a domain error.
    pub async fn create(
        &self,
        draft: &JutsuDraft,
        image: Option<String>,
        now: &str,
    ) -> Result<Jutsu, DbErr> {
        let model = jutsus::ActiveModel {
            name: Set(draft.name.clone()),
            description: Set(draft.description.clone()),
            element: Set(draft.element.as_tag().to_string()),
            category: Set(draft.category.as_tag().to_string()),
            rank: Set(draft.rank.as_tag().to_string()),
            image: Set(image),
            created_at: Set(now.to_string()),
            updated_at: Set(now.to_string()),
            ..Default::default()
        };

        let inserted = model.insert(&self.conn).await?;

        info!("Added jutsu: {} (ID: {})", inserted.name, inserted.id);
        Ok(Self::map_model(inserted))
    }

    pub async fn get(&self, id: i32) -> Result<Option<Jutsu>, DbErr> {
        let model = Jutsus::find_by_id(id).one(&self.conn).await?;
        Ok(model.map(Self::map_model))
    }

    /// Applies a partial update and refreshes `updated_at`. `id` and
    /// `created_at` are never touched. Returns `None` when the record
    /// does not exist.
    pub async fn update(
        &self,
        id: i32,
        patch: &crate::models::JutsuPatch,
        now: &str,
    ) -> Result<Option<Jutsu>, DbErr> {
        let Some(existing) = Jutsus::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: jutsus::ActiveModel = existing.into();
        if let Some(name) = &patch.name {
            active.name = Set(name.clone());
        }
        if let Some(description) = &patch.description {
            active.description = Set(description.clone());
        }
        if let Some(element) = patch.element {
            active.element = Set(element.as_tag().to_string());
        }
        if let Some(category) = patch.category {
            active.category = Set(category.as_tag().to_string());
        }
        if let Some(rank) = patch.rank {
            active.rank = Set(rank.as_tag().to_string());
        }
        active.updated_at = Set(now.to_string());

        let updated = active.update(&self.conn).await?;
        Ok(Some(Self::map_model(updated)))
    }

    /// Replaces the stored image filename and refreshes `updated_at`.
    pub async fn set_image(
        &self,
        id: i32,
        image: Option<String>,
        now: &str,
    ) -> Result<Option<Jutsu>, DbErr> {
        let Some(existing) = Jutsus::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: jutsus::ActiveModel = existing.into();
        active.image = Set(image);
        active.updated_at = Set(now.to_string());

        let updated = active.update(&self.conn).await?;
        Ok(Some(Self::map_model(updated)))
    }

    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = Jutsus::delete_by_id(id).exec(&self.conn).await?;
        let removed = result.rows_affected > 0;
        if removed {
            info!("Removed jutsu with ID: {}", id);
        }
        Ok(removed)
    }

    fn filter_condition(filter: &JutsuFilter) -> Condition {
        let mut cond = Condition::all();

        if let Some(query) = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
        {
            let pattern = format!("%{}%", query.to_lowercase());
            cond = cond.add(
                Condition::any()
                    .add(Expr::expr(Func::lower(Expr::col(jutsus::Column::Name))).like(&pattern))
                    .add(
                        Expr::expr(Func::lower(Expr::col(jutsus::Column::Description)))
                            .like(&pattern),
                    ),
            );
        }

        if let Some(element) = filter.element {
            cond = cond.add(jutsus::Column::Element.eq(element.as_tag()));
        }
        if let Some(category) = filter.category {
            cond = cond.add(jutsus::Column::Category.eq(category.as_tag()));
        }
        if let Some(rank) = filter.rank {
            cond = cond.add(jutsus::Column::Rank.eq(rank.as_tag()));
        }

        cond
    }

    /// Runs a filtered, ordered, paginated list query. An out-of-range page
    /// yields an empty page, never an error.
    pub async fn list(&self, filter: &JutsuFilter) -> Result<Page, DbErr> {
        let mut query = Jutsus::find().filter(Self::filter_condition(filter));

        query = match filter.ordering {
            Ordering::NameAsc => query.order_by_asc(jutsus::Column::Name),
            Ordering::NameDesc => query.order_by_desc(jutsus::Column::Name),
            Ordering::CreatedAsc => query
                .order_by_asc(jutsus::Column::CreatedAt)
                .order_by_asc(jutsus::Column::Id),
            Ordering::CreatedDesc => query
                .order_by_desc(jutsus::Column::CreatedAt)
                .order_by_desc(jutsus::Column::Id),
            Ordering::RankAsc => query
                .order_by(Expr::cust(RANK_ORDER_SQL), Order::Asc)
                .order_by_asc(jutsus::Column::Name),
            Ordering::RankDesc => query
                .order_by(Expr::cust(RANK_ORDER_SQL), Order::Desc)
                .order_by_asc(jutsus::Column::Name),
        };

        let page_size = filter.page_size.max(1);
        let page = filter.page.max(1);

        let paginator = query.paginate(&self.conn, page_size);
        let counts = paginator.num_items_and_pages().await?;
        let models = paginator.fetch_page(page - 1).await?;

        Ok(Page {
            items: models.into_iter().map(Self::map_model).collect(),
            total: counts.number_of_items,
            page,
            page_size,
            total_pages: counts.number_of_pages,
        })
    }

    pub async fn total(&self) -> Result<u64, DbErr> {
        Jutsus::find().count(&self.conn).await
    }

    /// Grouped counts per element, most common first. Ties fall back to the
    /// grouping column so the order stays deterministic.
    pub async fn count_by_element(&self) -> Result<Vec<(Element, u64)>, DbErr> {
        let rows = self.grouped_counts(jutsus::Column::Element).await?;
        Ok(rows
            .into_iter()
            .map(|(tag, count)| (Element::from_tag(&tag).unwrap_or_default(), count))
            .collect())
    }

    /// Grouped counts per category, most common first.
    pub async fn count_by_category(&self) -> Result<Vec<(Category, u64)>, DbErr> {
        let rows = self.grouped_counts(jutsus::Column::Category).await?;
        Ok(rows
            .into_iter()
            .map(|(tag, count)| (Category::from_tag(&tag).unwrap_or_default(), count))
            .collect())
    }

    /// Grouped counts per rank in declaration order (E through SS), not
    /// count order and not string order.
    pub async fn count_by_rank(&self) -> Result<Vec<(Rank, u64)>, DbErr> {
        let rows: Vec<(String, i64)> = Jutsus::find()
            .select_only()
            .column(jutsus::Column::Rank)
            .column_as(jutsus::Column::Id.count(), "count")
            .group_by(jutsus::Column::Rank)
            .into_tuple()
            .all(&self.conn)
            .await?;

        let mut counts: Vec<(Rank, u64)> = rows
            .into_iter()
            .map(|(tag, count)| {
                (
                    Rank::from_tag(&tag).unwrap_or_default(),
                    u64::try_from(count).unwrap_or(0),
                )
            })
            .collect();
        counts.sort_by_key(|(rank, _)| rank.ordinal());
        Ok(counts)
    }

    async fn grouped_counts(&self, column: jutsus::Column) -> Result<Vec<(String, u64)>, DbErr> {
        let rows: Vec<(String, i64)> = Jutsus::find()
            .select_only()
            .column(column)
            .column_as(jutsus::Column::Id.count(), "count")
            .group_by(column)
            .order_by(Expr::col(Alias::new("count")), Order::Desc)
            .order_by(column, Order::Asc)
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(tag, count)| (tag, u64::try_from(count).unwrap_or(0)))
            .collect())
    }

    /// The `n` most recently created records, newest first.
    pub async fn recently_created(&self, n: u64) -> Result<Vec<Jutsu>, DbErr> {
        let models = Jutsus::find()
            .order_by_desc(jutsus::Column::CreatedAt)
            .order_by_desc(jutsus::Column::Id)
            .limit(n)
            .all(&self.conn)
            .await?;

        Ok(models.into_iter().map(Self::map_model).collect())
    }

    /// All records matching one element, unordered beyond store order.
    pub async fn by_element(&self, element: Element) -> Result<Vec<Jutsu>, DbErr> {
        let models = Jutsus::find()
            .filter(jutsus::Column::Element.eq(element.as_tag()))
            .all(&self.conn)
            .await?;
        Ok(models.into_iter().map(Self::map_model).collect())
    }

    /// All records in any of the given ranks.
    pub async fn by_ranks(&self, ranks: &[Rank]) -> Result<Vec<Jutsu>, DbErr> {
        let tags: Vec<&str> = ranks.iter().map(|r| r.as_tag()).collect();
        let models = Jutsus::find()
            .filter(jutsus::Column::Rank.is_in(tags))
            .all(&self.conn)
            .await?;
        Ok(models.into_iter().map(Self::map_model).collect())
    }
}
