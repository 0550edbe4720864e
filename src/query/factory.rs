//! Named factories for canned query variants
//!
//! A factory fixes the raw fetch and the post-query phases of one variant
//! and hands out a fresh, single-use [`CannedQuery`] per request.

use super::parameters::QueryParameters;
use super::pipeline::CannedQuery;

/// Builds canned queries for one named variant
pub trait QueryFactory<P, R>: Send + Sync {
    /// Name of the variant, for registries and logs
    fn name(&self) -> &str;

    /// A new, not yet executed query for `parameters`
    fn canned_query(&self, parameters: QueryParameters<P>) -> CannedQuery<P, R>;

    /// The caller's execution id, or a fresh one
    fn query_execution_id(&self, parameters: &QueryParameters<P>) -> String {
        parameters.query_execution_id_or_new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use uuid::Uuid;

    use crate::permission::IncrementalPermissionFilter;
    use crate::query::errors::QueryResult;
    use crate::query::phases::{PostQueryPhases, RawResults};
    use crate::query::sort::{KeyedSorter, SortSpec};

    #[derive(Debug, Clone, PartialEq)]
    struct Post {
        id: u32,
        author: &'static str,
        published: bool,
    }

    struct DraftsAndPublished {
        posts: Arc<Vec<Post>>,
    }

    impl QueryFactory<(), Post> for DraftsAndPublished {
        fn name(&self) -> &str {
            "draftsAndPublishedBlogPosts"
        }

        fn canned_query(&self, parameters: QueryParameters<()>) -> CannedQuery<(), Post> {
            let id = self.query_execution_id(&parameters);
            let posts = Arc::clone(&self.posts);
            let fetch = move |_: &QueryParameters<()>| -> QueryResult<Option<RawResults<Post>>> {
                Ok(Some(RawResults::new(posts.as_ref().clone())))
            };
            let sorter = KeyedSorter::new(|post: &Post, key: &str| match key {
                "id" => Some(post.id),
                _ => None,
            });
            let evaluator = |post: &Post, token: &str| -> QueryResult<bool> {
                Ok(post.published || post.author == token)
            };

            let phases = PostQueryPhases::new()
                .with_sorting(sorter)
                .with_permissions(IncrementalPermissionFilter::new(evaluator));
            CannedQuery::new(parameters, id, fetch, phases)
        }
    }

    fn factory() -> DraftsAndPublished {
        DraftsAndPublished {
            posts: Arc::new(vec![
                Post { id: 1, author: "alice", published: true },
                Post { id: 3, author: "bob", published: false },
                Post { id: 2, author: "alice", published: false },
            ]),
        }
    }

    #[test]
    fn test_caller_id_is_kept() {
        let params = QueryParameters::new(()).with_query_execution_id("exec-42");
        assert_eq!(factory().query_execution_id(&params), "exec-42");
    }

    #[test]
    fn test_generated_ids_are_unique_uuids() {
        let params = QueryParameters::new(());
        let first = factory().query_execution_id(&params);
        let second = factory().query_execution_id(&params);

        assert_ne!(first, second);
        assert!(Uuid::parse_str(&first).is_ok());
    }

    #[test]
    fn test_each_query_is_fresh() {
        let factory = factory();
        let first = factory.canned_query(QueryParameters::new(()));
        assert!(first.execute().is_ok());

        let second = factory.canned_query(QueryParameters::new(()));
        assert!(second.execute().is_ok());
        assert_ne!(first.query_execution_id(), second.query_execution_id());
    }

    #[test]
    fn test_variant_sorts_and_filters() {
        let params = QueryParameters::new(())
            .with_sort(SortSpec::desc("id"))
            .with_authentication_token("alice");
        let query = factory().canned_query(params);

        let results = query.execute().unwrap();
        let ids: Vec<u32> = results.page().unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert!(results.permissions_applied());
        assert_eq!(factory().name(), "draftsAndPublishedBlogPosts");
    }
}
