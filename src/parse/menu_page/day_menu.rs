use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::category::MealCategory;
use crate::parse::Error;
use crate::static_selector;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayMenu {
    // serialized as yyyy-MM-dd
    pub date: NaiveDate,
    pub label: String,
    pub categories: Vec<MealCategory>,
}

impl DayMenu {
    /// Builds the menu of one day from its dish row. Each `.dish-column` is
    /// walked on its own; a row without columns is treated as one column.
    pub fn from_html_element(
        date: NaiveDate,
        label: String,
        row: scraper::ElementRef,
        skipped: &mut usize,
    ) -> Result<Self, Error> {
        static_selector!(COLUMN_SELECTOR <- ".dish-column");
        let mut columns: Vec<_> = row.select(&COLUMN_SELECTOR).collect();
        if columns.is_empty() {
            columns.push(row);
        }
        let mut categories = Vec::new();
        for column in columns {
            categories.extend(MealCategory::from_column(column, skipped)?);
        }
        Ok(Self {
            date,
            label,
            categories,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_keep_source_order() {
        static_selector!(ROW <- ".dish-row");
        let doc = scraper::Html::parse_fragment(
            r#"<div class="dish-row">
                 <div class="dish-column">
                   <h4 class="category-heading">Aktion</h4>
                   <div class="dish"><h5 class="dish-title">Burger</h5></div>
                 </div>
                 <div class="dish-column">
                   <div class="dish"><h5 class="dish-title">Suppe</h5></div>
                   <h4 class="category-heading">Dessert</h4>
                   <div class="dish"><h5 class="dish-title">Obst</h5></div>
                 </div>
               </div>"#,
        );
        let row = doc.select(&ROW).next().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 12, 16).unwrap();
        let mut skipped = 0;
        let day = DayMenu::from_html_element(date, "Montag, 16.12.".into(), row, &mut skipped)
            .unwrap();
        let titles: Vec<String> = day.categories.iter().map(|c| c.title.to_string()).collect();
        assert_eq!(titles, vec!["Aktion", "Uncategorized", "Dessert"]);
        assert_eq!(skipped, 0);
    }

    #[test]
    fn test_row_without_columns() {
        static_selector!(ROW <- ".dish-row");
        let doc = scraper::Html::parse_fragment(
            r#"<div class="dish-row"><div class="dish"><h5 class="dish-title">Eintopf</h5></div></div>"#,
        );
        let row = doc.select(&ROW).next().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 12, 17).unwrap();
        let mut skipped = 0;
        let day = DayMenu::from_html_element(date, "Dienstag".into(), row, &mut skipped).unwrap();
        assert_eq!(day.categories.len(), 1);
        assert_eq!(day.categories[0].meals[0].title, "Eintopf");
    }
}
