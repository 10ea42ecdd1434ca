use std::path::PathBuf;

use chrono::{DateTime, Utc};
use scraper::Html;

use crate::{
    config::{Config, Source},
    fetch::{fetch_document, make_client},
    parse::MenuPage,
    store::FileStore,
    week::{partition_by_week, Aggregator, DayGroupedWeek, OutputWeek, WeekKey},
};

pub fn canteens_path(key: WeekKey) -> PathBuf {
    PathBuf::from("canteens").join(format!("{key}.json"))
}

pub fn days_path(key: WeekKey) -> PathBuf {
    PathBuf::from("days").join(format!("{key}.json"))
}

/// Fetches every source one after another. The first failure aborts the run.
pub async fn fetch_all(client: &reqwest::Client, sources: &[Source]) -> crate::Result<Vec<String>> {
    let mut pages = Vec::with_capacity(sources.len());
    for source in sources {
        log::info!("Fetching {} from {}", source.slug, source.url);
        let page = fetch_document(client, &source.url).await.map_err(|e| {
            log::error!("Fetching {} failed", source.slug);
            e
        })?;
        pages.push(page);
    }
    Ok(pages)
}

/// Extracts, partitions and aggregates the raw pages of all sources into one
/// canteen-indexed document per ISO week.
pub fn aggregate_pages<'a>(
    pages: impl IntoIterator<Item = (&'a Source, &'a str)>,
    generated_at: DateTime<Utc>,
) -> crate::Result<Vec<OutputWeek>> {
    let mut aggregator = Aggregator::new();
    for (source, raw) in pages {
        let html = Html::parse_document(raw);
        let page = MenuPage::from_html(&html).map_err(|e| {
            log::error!("Extracting {} failed", source.slug);
            e
        })?;
        for warning in &page.warnings {
            log::warn!("{}: {warning}", source.slug);
        }
        if page.legend.is_none() {
            log::warn!("{}: no legend found", source.slug);
        }
        log::info!("{}: {} day(s) extracted", source.slug, page.days.len());
        aggregator.add_source(source, page.legend.as_ref(), partition_by_week(page.days));
    }
    Ok(aggregator.finish(generated_at))
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub written: usize,
    pub unchanged: usize,
}

/// Writes both views of every week, skipping files whose content is current.
pub async fn write_weeks(store: &FileStore, weeks: &[OutputWeek]) -> crate::Result<WriteSummary> {
    let mut summary = WriteSummary::default();
    for week in weeks {
        let key = week.week.key();
        let by_day = DayGroupedWeek::from(week);
        for (path, written) in [
            (canteens_path(key), store.write_if_changed(canteens_path(key), week).await?),
            (days_path(key), store.write_if_changed(days_path(key), &by_day).await?),
        ] {
            let path = store.root().join(path);
            if written {
                log::info!("Wrote {}", path.display());
                summary.written += 1;
            } else {
                log::info!("{} unchanged", path.display());
                summary.unchanged += 1;
            }
        }
    }
    Ok(summary)
}

/// Nothing is written unless every source was fetched and extracted.
pub async fn run(config: &Config) -> crate::Result<WriteSummary> {
    let client = make_client();
    let pages = fetch_all(&client, &config.sources).await?;
    let weeks = aggregate_pages(
        config.sources.iter().zip(pages.iter().map(String::as_str)),
        Utc::now(),
    )?;
    if weeks.is_empty() {
        log::warn!("No menus found on any source");
    }
    let store = FileStore::open(&config.out_dir).await?;
    write_weeks(&store, &weeks).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::parse;
    use chrono::NaiveDate;

    fn source(slug: &str) -> Source {
        Source {
            slug: slug.to_owned(),
            name: format!("Mensa {slug}"),
            url: format!("https://mensa.example.org/{slug}").parse().unwrap(),
        }
    }

    fn one_day_page(label: &str, dish: &str) -> String {
        format!(
            r#"<html><body><div class="week-menu">
                 <h2 class="week-heading">Speiseplan vom 06.01.2025</h2>
                 <div class="day-label">{label}</div>
                 <div class="dish-row"><div class="dish-column">
                   <h4 class="category-heading">Hauptgerichte</h4>
                   <div class="dish"><h5 class="dish-title">{dish}</h5>
                   <p class="dish-price">2,50 € / 4,00 €</p></div>
                 </div></div>
               </div></body></html>"#
        )
    }

    fn generated_at() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_736_143_200, 0).unwrap()
    }

    #[test]
    fn test_two_sources_share_one_day() {
        let zoo = source("zoo");
        let alpha = source("alpha");
        let zoo_page = one_day_page("Dienstag, 07.01.", "Ofenkartoffel");
        let alpha_page = one_day_page("Di 07.01.", "Nudelauflauf");
        let weeks = aggregate_pages(
            [(&zoo, zoo_page.as_str()), (&alpha, alpha_page.as_str())],
            generated_at(),
        )
        .unwrap();
        assert_eq!(weeks.len(), 1);

        let by_day = DayGroupedWeek::from(&weeks[0]);
        assert_eq!(by_day.days.len(), 1);
        let tuesday = NaiveDate::from_ymd_opt(2025, 1, 7).unwrap();
        let entry = &by_day.days[&tuesday];
        assert_eq!(entry.canteens.keys().collect::<Vec<_>>(), vec!["alpha", "zoo"]);
        assert_eq!(entry.canteens["zoo"].categories[0].meals[0].title, "Ofenkartoffel");
        assert_eq!(
            entry.canteens["alpha"].categories[0].meals[0]
                .price
                .as_ref()
                .unwrap()
                .labels,
            vec!["students", "guests"]
        );
    }

    #[test]
    fn test_broken_source_fails_the_run() {
        let good = source("good");
        let bad = source("bad");
        let good_page = one_day_page("Mo 06.01.", "Suppe");
        let result = aggregate_pages(
            [(&good, good_page.as_str()), (&bad, "<p>Umbau</p>")],
            generated_at(),
        );
        assert!(matches!(result, Err(Error::Parse(parse::Error::HtmlParse(_)))));
    }

    #[tokio::test]
    async fn test_rerun_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        let mensa = source("mensa");
        let page = one_day_page("Mo 06.01.", "Suppe");

        let weeks = aggregate_pages([(&mensa, page.as_str())], generated_at()).unwrap();
        let first = write_weeks(&store, &weeks).await.unwrap();
        assert_eq!(first, WriteSummary { written: 2, unchanged: 0 });
        let stored = std::fs::read_to_string(dir.path().join("days/2025-W02.json")).unwrap();
        assert!(stored.ends_with('\n'));

        let weeks = aggregate_pages([(&mensa, page.as_str())], Utc::now()).unwrap();
        let second = write_weeks(&store, &weeks).await.unwrap();
        assert_eq!(second, WriteSummary { written: 0, unchanged: 2 });
        assert_eq!(
            std::fs::read_to_string(dir.path().join("days/2025-W02.json")).unwrap(),
            stored
        );
    }
}
