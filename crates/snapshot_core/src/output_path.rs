/// Directory, relative to the working directory, that holds the build and the snapshots.
pub const OUTPUT_DIR: &str = "build";

/// Port the static server binds in production.
pub const DEFAULT_PORT: u16 = 9000;

/// Route of the synthetic entry that carries the unrendered `index.html`.
pub const FALLBACK_ROUTE: &str = "/200";

/// The synthetic entry is written here without going through [`map_to_output_path`].
pub const FALLBACK_OUTPUT_PATH: &str = "build/200.html";

pub fn server_root(port: u16) -> String {
    format!("http://localhost:{port}")
}

/// Routes requested before any link discovery: the app root and the not-found page.
pub fn seed_paths(root: &str) -> Vec<String> {
    vec![format!("{root}/"), format!("{root}/404")]
}

/// Maps a live URL under `root` to the relative path its snapshot is written to.
///
/// `/` becomes `build/index.html`, `/404` becomes `build/404.html`, and a route
/// ending in a slash gets an `index` stem inside that directory. `url` must
/// start with `root`; anything else is mapped as if it were a bare route.
///
/// A directory route and its explicit `index` page (`/docs/` and `/docs/index`)
/// share one path. The orchestrator keeps the first crawled page of such a pair.
pub fn map_to_output_path(root: &str, url: &str) -> String {
    let route = url.strip_prefix(root).unwrap_or(url);
    if route.is_empty() {
        format!("{OUTPUT_DIR}/index.html")
    } else if route.ends_with('/') {
        format!("{OUTPUT_DIR}{route}index.html")
    } else {
        format!("{OUTPUT_DIR}{route}.html")
    }
}

/// Route portion of `url` for display; the root route is shown as `/`.
pub fn route_of<'a>(root: &str, url: &'a str) -> &'a str {
    match url.strip_prefix(root).unwrap_or(url) {
        "" => "/",
        route => route,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    const ROOT: &str = "http://localhost:9000";

    #[test]
    fn root_route_maps_to_index() {
        assert_eq!(map_to_output_path(ROOT, "http://localhost:9000/"), "build/index.html");
        assert_eq!(map_to_output_path(ROOT, ROOT), "build/index.html");
    }

    #[test]
    fn not_found_route_maps_to_404() {
        assert_eq!(map_to_output_path(ROOT, "http://localhost:9000/404"), "build/404.html");
    }

    #[test]
    fn nested_routes_mirror_directories() {
        assert_eq!(
            map_to_output_path(ROOT, "http://localhost:9000/blog/first-post"),
            "build/blog/first-post.html"
        );
        assert_eq!(
            map_to_output_path(ROOT, "http://localhost:9000/docs/"),
            "build/docs/index.html"
        );
    }

    #[test]
    fn distinct_routes_never_share_an_output_path() {
        let routes = ["/", "/404", "/about", "/about/", "/about/team", "/blog", "/blog/a"];
        let paths: HashSet<String> = routes
            .iter()
            .map(|r| map_to_output_path(ROOT, &format!("{ROOT}{r}")))
            .collect();
        assert_eq!(paths.len(), routes.len());
    }

    #[test]
    fn index_aliases_share_the_directory_path() {
        assert_eq!(
            map_to_output_path(ROOT, "http://localhost:9000/docs/index"),
            map_to_output_path(ROOT, "http://localhost:9000/docs/")
        );
        assert_eq!(
            map_to_output_path(ROOT, "http://localhost:9000/index"),
            map_to_output_path(ROOT, "http://localhost:9000/")
        );
    }

    #[test]
    fn mapping_is_deterministic() {
        let url = "http://localhost:9000/pricing";
        assert_eq!(map_to_output_path(ROOT, url), map_to_output_path(ROOT, url));
    }

    #[test]
    fn route_of_renders_root_as_slash() {
        assert_eq!(route_of(ROOT, ROOT), "/");
        assert_eq!(route_of(ROOT, "http://localhost:9000/"), "/");
        assert_eq!(route_of(ROOT, "http://localhost:9000/200"), "/200");
    }

    #[test]
    fn seeds_are_root_and_not_found() {
        assert_eq!(
            seed_paths(&server_root(DEFAULT_PORT)),
            vec![
                "http://localhost:9000/".to_string(),
                "http://localhost:9000/404".to_string()
            ]
        );
    }
}
