use crate::observable::Observable;

/// Calls `factory` lazily for every subscription and subscribes to the
/// observable it returns, so source construction side effects happen per
/// subscriber and only once someone actually subscribes.
pub fn defer<Item, F>(factory: F) -> Observable<Item>
where
  Item: Send + 'static,
  F: Fn() -> Observable<Item> + Send + Sync + 'static,
{
  Observable::create(move |observer| factory().actual_subscribe(observer))
}
