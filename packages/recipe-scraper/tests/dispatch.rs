//! URL dispatch and single-recipe scraping through the public API.

use std::sync::Arc;

use recipe_scraper::testing::{fixtures, BrowserCall, MockBrowser};
use recipe_scraper::{
    MemoryRecipeStore, ProxyPool, ProxySource, RecipeScraper, RecipeStore, ScrapeError,
    ScraperConfig, SiteRegistry,
};

#[test]
fn test_known_urls_resolve_to_their_sites() {
    let registry = SiteRegistry::with_builtin_sites(ScraperConfig::immediate());

    let cases = [
        ("https://cookpad.com/ar/recetas/123", "Cookpad"),
        ("https://www.paulinacocina.net/receta-de-flan/", "Paulina Cocina"),
        ("https://www.recetasderechupete.com/tortilla-de-patatas/", "Recetas de Rechupete"),
        ("https://www.allrecipes.com/recipe/12345/banana-bread/", "AllRecipes"),
        ("https://tasty.co/recipe/chocolate-cake", "Tasty"),
    ];

    for (url, site) in cases {
        let scraper = registry
            .resolve(url)
            .unwrap_or_else(|| panic!("{} should resolve", url));
        assert_eq!(scraper.site_name(), site, "wrong site for {}", url);
    }

    assert!(registry.resolve("https://unsupported-site.com/recipe").is_none());
    assert!(!registry.is_url_supported("not a url"));
    assert_eq!(registry.list_supported_sites().len(), 10);
}

#[tokio::test]
async fn test_unsupported_url_fails_without_browser() {
    let browser = MockBrowser::new();
    let registry = SiteRegistry::with_builtin_sites(ScraperConfig::immediate());
    let scraper = RecipeScraper::new(
        Arc::new(registry),
        Arc::new(browser.clone()),
        Arc::new(MemoryRecipeStore::new()),
    );

    let err = scraper
        .scrape_one("https://unsupported-site.com/recipe")
        .await
        .unwrap_err();

    assert!(matches!(err, ScrapeError::UnsupportedUrl { .. }));
    assert_eq!(browser.opened_count(), 0);
}

#[tokio::test]
async fn test_scrapes_rotate_through_proxies() {
    let urls = [
        "https://cookpad.com/ar/recetas/1",
        "https://cookpad.com/ar/recetas/2",
        "https://cookpad.com/ar/recetas/3",
    ];
    let mut browser = MockBrowser::new();
    for (i, url) in urls.iter().enumerate() {
        browser = browser.with_page(*url, fixtures::spanish_recipe(&format!("Guiso {}", i)));
    }

    let pool = Arc::new(ProxyPool::new(true));
    pool.add("http://10.0.0.1:8080");
    pool.add("http://10.0.0.2:8080");

    let registry = SiteRegistry::with_builtin_sites(ScraperConfig::immediate())
        .with_proxy_source(pool.clone());
    let store = Arc::new(MemoryRecipeStore::new());
    let scraper = RecipeScraper::new(Arc::new(registry), Arc::new(browser.clone()), store.clone());

    for url in urls {
        scraper.scrape_one(url).await.unwrap();
    }

    let proxies: Vec<Option<String>> = browser
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            BrowserCall::Open { proxy } => Some(proxy),
            _ => None,
        })
        .collect();
    assert_eq!(
        proxies,
        vec![
            Some("http://10.0.0.1:8080".to_string()),
            Some("http://10.0.0.2:8080".to_string()),
            Some("http://10.0.0.1:8080".to_string()),
        ]
    );
    assert_eq!(store.count().await.unwrap(), 3);
}

#[tokio::test]
async fn test_failed_navigation_takes_proxy_out_of_rotation() {
    let url = "https://cookpad.com/ar/recetas/404";
    let browser = MockBrowser::new().with_failure(url);

    let pool = Arc::new(ProxyPool::new(true));
    pool.add("http://10.0.0.1:8080");
    pool.add("http://10.0.0.2:8080");

    let registry = SiteRegistry::with_builtin_sites(ScraperConfig::immediate())
        .with_proxy_source(pool.clone());
    let scraper = RecipeScraper::new(
        Arc::new(registry),
        Arc::new(browser),
        Arc::new(MemoryRecipeStore::new()),
    );

    let err = scraper.scrape_one(url).await.unwrap_err();

    assert!(matches!(err, ScrapeError::Navigation(_)));
    assert_eq!(pool.available(), 1);
    assert_eq!(pool.next_proxy().as_deref(), Some("http://10.0.0.2:8080"));
}
