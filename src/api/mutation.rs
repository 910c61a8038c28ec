use juniper::EmptyMutation;
use super::Context;


/// The root mutation object.
///
/// All data is read-only, so this does not offer any resolvers.
pub(crate) type Mutation = EmptyMutation<Context>;
