mod crawl_tests;
mod fetch_tests;
