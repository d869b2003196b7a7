//! End-to-end article discovery over an Atypon-style site, where each article
//! lives under `/doi/full/…`, `/doi/pdf/…` and a family of `/action/…` export
//! URLs.

use folio_articles::{
    ArticleFiles, ArticleIteratorBuilder, ArticleTable, AspectDef, ContentRequirement, DedupPolicy, IteratorSpec,
    MetadataTarget, Resolution, Role,
};
use folio_store::{ArchivalUnit, AuParams, CachedUrl, MemoryStore};
use rstest::{fixture, rstest};

const BASE: &str = "http://www.nejm.org/";

const CITATIONS: [(&str, Role); 6] = [
    ("ris", Role::CITATION_RIS),
    ("bibtex", Role::CITATION_BIBTEX),
    ("endnote", Role::CITATION_ENDNOTE),
    ("medlars", Role::CITATION_MEDLARS),
    ("procite", Role::CITATION_PROCITE),
    ("refworks", Role::CITATION_REFMGR),
];

fn builder() -> ArticleIteratorBuilder {
    let mut builder = ArticleIteratorBuilder::new()
        .with_spec(
            IteratorSpec::new()
                .with_root_templates([r#""%sdoi/", base_url"#])
                .with_pattern_template(r"^{{ base_url }}doi/(full|pdf)/[.0-9]+/[^/?&]+$"),
        )
        .add_aspect(
            AspectDef::major([r"/doi/full/([.0-9]+)/([^/?&]+)$"], ["/doi/full/$1/$2"], [Role::FULL_TEXT_HTML])
                .with_content(ContentRequirement::Html),
        )
        .add_aspect(
            AspectDef::major([r"/doi/pdf/([.0-9]+)/([^/?&]+)$"], ["/doi/pdf/$1/$2"], [Role::FULL_TEXT_PDF])
                .with_content(ContentRequirement::Pdf),
        );
    for (format, role) in CITATIONS {
        builder = builder.add_aspect(AspectDef::minor(
            [format!("/action/downloadCitation?doi=$1%2F$2&format={format}&include=cit")],
            [role],
        ));
    }
    builder
        .add_aspect(AspectDef::minor(["/action/showSupplements?doi=$1%2F$2"], [Role::SUPPLEMENTARY_MATERIALS]))
        .with_role_from_other_roles(Role::CITATION, CITATIONS.map(|(_, role)| role))
        .with_full_text_from_roles([Role::FULL_TEXT_HTML, Role::FULL_TEXT_PDF])
}

#[fixture]
fn table() -> ArticleTable {
    builder().build(&AuParams::new().with("base_url", BASE)).unwrap()
}

fn full(id: &str) -> CachedUrl {
    CachedUrl::html(format!("{BASE}doi/full/10.1056/{id}"))
}

fn pdf(id: &str) -> CachedUrl {
    CachedUrl::pdf(format!("{BASE}doi/pdf/10.1056/{id}"))
}

fn citation(id: &str, format: &str) -> CachedUrl {
    CachedUrl::new(
        format!("{BASE}action/downloadCitation?doi=10.1056%2F{id}&format={format}&include=cit"),
        Some("text/plain".to_string()),
    )
}

fn supplement(id: &str) -> CachedUrl {
    CachedUrl::html(format!("{BASE}action/showSupplements?doi=10.1056%2F{id}"))
}

fn store(cus: impl IntoIterator<Item = CachedUrl>) -> MemoryStore {
    MemoryStore::new("nejm-2011").with_param("base_url", BASE).with_cus(cus)
}

fn articles(table: &ArticleTable, au: &dyn ArchivalUnit) -> Vec<ArticleFiles> {
    table.iterator(au, MetadataTarget::metadata()).collect()
}

#[rstest]
fn test_html_pdf_and_ris(table: ArticleTable) {
    let au = store([full("X"), pdf("X"), citation("X", "ris"), CachedUrl::html(format!("{BASE}toc/nejm/364/1"))]);
    let found = articles(&table, &au);
    assert_eq!(found.len(), 1);
    let af = &found[0];
    let ris = citation("X", "ris");
    assert_eq!(af.full_text_url(), Some(full("X").url()));
    assert_eq!(af.role_url(Role::FULL_TEXT_HTML), Some(full("X").url()));
    assert_eq!(af.role_url(Role::FULL_TEXT_PDF), Some(pdf("X").url()));
    assert_eq!(af.role_url(Role::CITATION_RIS), Some(ris.url()));
    assert_eq!(af.role_url(Role::CITATION), Some(ris.url()));
    assert_eq!(af.role_url(Role::CITATION_BIBTEX), None);
}

#[rstest]
fn test_pdf_only(table: ArticleTable) {
    let au = store([pdf("Y")]);
    let found = articles(&table, &au);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].full_text_url(), Some(pdf("Y").url()));
    assert_eq!(found[0].role_url(Role::FULL_TEXT_HTML), None);
}

#[rstest]
fn test_html_only(table: ArticleTable) {
    let au = store([full("H")]);
    let found = articles(&table, &au);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].full_text_url(), Some(full("H").url()));
    assert_eq!(found[0].role_url(Role::FULL_TEXT_PDF), None);
}

#[rstest]
fn test_pdf_trigger_is_suppressed(table: ArticleTable) {
    let au = store([full("Z"), pdf("Z")]);
    let target = MetadataTarget::metadata();
    assert!(matches!(table.resolve(&au, &pdf("Z"), &target), Resolution::Deferred { to } if to == full("Z").url()));
    assert!(matches!(table.resolve(&au, &full("Z"), &target), Resolution::Article(_)));

    let found = articles(&table, &au);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].full_text_url(), Some(full("Z").url()));
}

#[rstest]
fn test_complete_aspect_set(table: ArticleTable) {
    let mut cus = vec![full("C"), pdf("C"), supplement("C")];
    cus.extend(CITATIONS.iter().map(|(format, _)| citation("C", format)));
    let au = store(cus);
    let found = articles(&table, &au);
    assert_eq!(found.len(), 1);
    let af = &found[0];
    // Every citation format, HTML, PDF and the supplement, plus the generic
    // citation alias.
    assert_eq!(af.role_count(), CITATIONS.len() + 3 + 1);
    for (format, role) in CITATIONS {
        assert_eq!(af.role_url(&role), Some(citation("C", format).url()));
    }
    assert_eq!(af.role_url(Role::SUPPLEMENTARY_MATERIALS), Some(supplement("C").url()));
    // First declared format present wins the alias.
    assert_eq!(af.role_url(Role::CITATION), Some(citation("C", "ris").url()));
}

#[rstest]
fn test_citation_alias_follows_declaration_order(table: ArticleTable) {
    let au = store([full("B"), citation("B", "medlars"), citation("B", "bibtex")]);
    let found = articles(&table, &au);
    assert_eq!(found[0].role_url(Role::CITATION), Some(citation("B", "bibtex").url()));
}

#[rstest]
fn test_counting_articles_skips_secondary_aspects(table: ArticleTable) {
    let au = store([full("X"), pdf("X"), citation("X", "ris"), pdf("Y")]);
    let found: Vec<_> = table.iterator(&au, MetadataTarget::article()).collect();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].role_count(), 1);
    assert_eq!(found[0].role_url(Role::CITATION), None);
}

#[rstest]
fn test_resolution_is_idempotent(table: ArticleTable) {
    let au = store([full("X"), pdf("X"), citation("X", "ris"), citation("X", "bibtex"), pdf("Y"), full("Z")]);
    let target = MetadataTarget::metadata();
    assert_eq!(table.resolve(&au, &full("X"), &target), table.resolve(&au, &full("X"), &target));
    let first = articles(&table, &au);
    let second = articles(&table, &au);
    assert_eq!(first.len(), 3);
    assert_eq!(first, second);
}

#[rstest]
fn test_articles_follow_url_order(table: ArticleTable) {
    let au = store([pdf("B"), full("C"), full("A")]);
    let urls: Vec<_> = articles(&table, &au).iter().filter_map(|af| af.full_text_url().map(String::from)).collect();
    assert_eq!(urls, [full("A").url(), full("C").url(), pdf("B").url()]);
}

#[rstest]
#[case::match_key(DedupPolicy::MatchKey, 1)]
#[case::deferral_only(DedupPolicy::DeferralOnly, 2)]
fn test_case_variant_shapes(#[case] dedup: DedupPolicy, #[case] expected: usize) {
    // The PDF's DOI suffix is stored in a different case, so deriving the
    // HTML URL from it finds nothing and deferral can't help.
    let table = builder().with_dedup(dedup).build(&AuParams::new().with("base_url", BASE)).unwrap();
    let au = store([full("NEJMoa1"), pdf("nejmoa1")]);
    assert_eq!(articles(&table, &au).len(), expected);
}

#[rstest]
fn test_html_shape_serving_pdf_is_not_html(table: ArticleTable) {
    let au = store([CachedUrl::pdf(format!("{BASE}doi/full/10.1056/P"))]);
    assert!(articles(&table, &au).is_empty());
}
