//! The builtin plugin definitions, end to end.

use folio_articles::{MetadataTarget, Role};
use folio_config::{Builtins, PluginDefinition, Settings};
use folio_metadata::{ArticleMetadata, MetadataField};
use folio_store::{ArchivalUnit, CachedUrl, MemoryStore};

const NEJM: &str = "http://www.nejm.org/";
const OJS: &str = "http://journals.example.edu/";

fn nejm(path: &str) -> String {
    format!("{NEJM}{path}")
}

fn ojs(path: &str) -> String {
    format!("{OJS}index.php/jmr/article/{path}")
}

#[test]
fn test_atypon_collects_every_aspect() {
    let definition = PluginDefinition::resolve("builtin:atypon", &Settings::default()).unwrap();
    let au = MemoryStore::new("nejm-2011").with_param("base_url", NEJM).with_cus([
        CachedUrl::html(nejm("doi/full/10.1056/NEJMoa1")),
        CachedUrl::pdf(nejm("doi/pdf/10.1056/NEJMoa1")),
        CachedUrl::html(nejm("doi/abs/10.1056/NEJMoa1")),
        CachedUrl::new(nejm("action/downloadCitation?doi=10.1056%2FNEJMoa1&format=bibtex&include=cit"), None),
        CachedUrl::pdf(nejm("doi/pdf/10.1056/NEJMoa2")),
        CachedUrl::html(nejm("toc/nejm/364/1")),
    ]);
    let table = definition.compile(au.params()).unwrap();
    let found: Vec<_> = table.iterator(&au, MetadataTarget::metadata()).collect();
    assert_eq!(found.len(), 2);

    let first = &found[0];
    assert_eq!(first.full_text_url(), Some(nejm("doi/full/10.1056/NEJMoa1").as_str()));
    assert_eq!(first.role_url(Role::FULL_TEXT_PDF), Some(nejm("doi/pdf/10.1056/NEJMoa1").as_str()));
    assert_eq!(first.role_url(Role::ARTICLE_METADATA), Some(nejm("doi/abs/10.1056/NEJMoa1").as_str()));
    assert_eq!(first.role_url(Role::CITATION), first.role_url(Role::CITATION_BIBTEX));
    assert!(first.has_role(Role::CITATION));

    assert_eq!(found[1].full_text_url(), Some(nejm("doi/pdf/10.1056/NEJMoa2").as_str()));
}

#[test]
fn test_ojs2_prefers_the_pdf_over_its_frame_and_drops_duplicates() {
    let definition = Builtins::load("ojs2").unwrap();
    let au = MemoryStore::new("jmr-12")
        .with_param("base_url", OJS)
        .with_param("journal_id", "jmr")
        .with_cus([
            CachedUrl::html(ojs("view/55")),
            CachedUrl::html(ojs("view/55/101")),
            CachedUrl::pdf(ojs("download/55/101")),
            CachedUrl::pdf(ojs("viewFile/55/101")),
            CachedUrl::html(ojs("view/56/102")),
        ]);
    let table = definition.compile(au.params()).unwrap();
    let found: Vec<_> = table.iterator(&au, MetadataTarget::metadata()).collect();
    assert_eq!(found.len(), 2);

    // download/ sorts first, so it starts the article and viewFile/ is a
    // duplicate of it.
    assert_eq!(found[0].full_text_url(), Some(ojs("download/55/101").as_str()));
    assert_eq!(found[0].role_url(Role::ABSTRACT), Some(ojs("view/55").as_str()));
    assert_eq!(found[0].role_url(Role::FULL_TEXT_PDF_LANDING_PAGE), Some(ojs("view/55/101").as_str()));

    assert_eq!(found[1].full_text_url(), Some(ojs("view/56/102").as_str()));
    assert_eq!(found[1].role_url(Role::FULL_TEXT_PDF), None);
}

#[test]
fn test_ojs2_cooks_citation_tags() {
    let table = Builtins::load("ojs2").unwrap().cook_table().unwrap().unwrap();
    let mut am = ArticleMetadata::new();
    am.put_raw("citation_doi", "10.5555/jmr.55");
    am.put_raw("citation_author", "Okafor, Ada");
    am.put_raw("citation_issn", "0000-0000");
    let errors = am.cook(&table);
    assert!(errors.is_empty());
    assert_eq!(am.get(&MetadataField::DOI), Some("10.5555/jmr.55"));
    assert_eq!(am.get_list(&MetadataField::AUTHOR), ["Okafor, Ada"]);
    assert_eq!(am.get(&MetadataField::ISSN), Some("0000-0000"));
}
