use super::params::Parameters;
use crate::object::ResponseObject;

/// Fills a route's response object from its bound parameters.
///
/// Closures with the matching signature implement this trait, so most routes
/// never name it:
///
/// ```rust
/// use strictapi::object::ResponseObject;
/// use strictapi::route::{Parameters, RouteHandler};
///
/// struct Echo;
///
/// impl RouteHandler for Echo {
///     fn handle(&self, params: &Parameters, response: &mut ResponseObject<'_>) -> anyhow::Result<()> {
///         if let Some(name) = params.string("name") {
///             response.set("name", name)?;
///         }
///         Ok(())
///     }
/// }
/// ```
///
/// Returning an error aborts the request. A
/// [`FieldTypeError`](crate::error::FieldTypeError) becomes a 400; anything
/// else becomes a 500.
pub trait RouteHandler: Send + Sync {
    fn handle(&self, params: &Parameters, response: &mut ResponseObject<'_>) -> anyhow::Result<()>;
}

impl<F> RouteHandler for F
where
    F: Fn(&Parameters, &mut ResponseObject<'_>) -> anyhow::Result<()> + Send + Sync,
{
    fn handle(&self, params: &Parameters, response: &mut ResponseObject<'_>) -> anyhow::Result<()> {
        self(params, response)
    }
}
