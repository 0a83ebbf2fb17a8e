use super::EntityMetadata;

/// Корень агрегата справочника
pub trait AggregateRoot {
    type Id;

    fn id(&self) -> Self::Id;

    /// Бизнес-код записи (например, "ACC01")
    fn code(&self) -> &str;

    fn name(&self) -> &str;

    fn metadata(&self) -> &EntityMetadata;

    /// Индекс агрегата в системе (например, "a001")
    fn aggregate_index() -> &'static str;

    /// Имя коллекции для БД (например, "station")
    fn collection_name() -> &'static str;

    /// Имя элемента для сообщений и логов
    fn element_name() -> &'static str;

    /// Имя таблицы: "a001_station"
    fn table_name() -> String {
        format!("{}_{}", Self::aggregate_index(), Self::collection_name())
    }
}
