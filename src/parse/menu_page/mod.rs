mod category;
mod date;
mod day_menu;
mod legend;
mod meal;
mod menu_page;
mod money;

pub use category::MealCategory;
pub use day_menu::DayMenu;
pub use legend::Legend;
pub use menu_page::MenuPage;
