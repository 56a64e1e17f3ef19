//! Weekly skeleton prompt: dish names only, no recipes.

use super::{
    diners_text, level_instruction, list_or_none, theme_instruction, PromptSpec,
    WEEKLY_SKELETON_TEMPERATURE,
};
use crate::ai::schema;
use crate::i18n::{TemplateArgs, TemplateKey, Translator};
use crate::llm::Task;
use crate::types::{CalendarLength, DifficultyLevel, Theme, UserProfile};

/// Recipe names that steer the skeleton towards or away from dishes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceSignals {
    /// Favorites to include. Empty unless the profile prioritizes favorites.
    pub favorites: Vec<String>,
    /// Recipes rated 4 or 5.
    pub highly_rated: Vec<String>,
    /// Recipes rated 1 or 2. These must never appear.
    pub poorly_rated: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct WeeklyPlanRequest<'a> {
    pub profile: &'a UserProfile,
    pub length: CalendarLength,
    pub level: DifficultyLevel,
    pub theme: Theme,
    pub leftovers: bool,
    pub signals: &'a PreferenceSignals,
}

/// Render the skeleton prompt. Dislikes are listed first since they
/// override everything else.
pub fn render_weekly_plan_prompt(
    translator: &dyn Translator,
    request: &WeeklyPlanRequest<'_>,
) -> PromptSpec {
    let signals = request.signals;
    let mut hints = Vec::new();
    for (key, names) in [
        (TemplateKey::PoorlyRatedHint, &signals.poorly_rated),
        (TemplateKey::HighlyRatedHint, &signals.highly_rated),
        (TemplateKey::FavoritesHint, &signals.favorites),
    ] {
        if !names.is_empty() {
            hints.push(translator.render(key, &TemplateArgs::new().with("recipes", names.join(", "))));
        }
    }

    let leftovers = if request.leftovers {
        translator.text(TemplateKey::LeftoverHint)
    } else {
        String::new()
    };

    let end_day = translator.text(TemplateKey::DayName(request.length.last_day()));
    let args = TemplateArgs::new()
        .with("days", request.length.day_count())
        .with("end_day", end_day)
        .with("hints", hints.join("\n"))
        .with("diners", diners_text(translator, &request.profile.diners))
        .with(
            "forbidden",
            list_or_none(translator, &request.profile.forbidden_foods),
        )
        .with("difficulty", level_instruction(translator, request.level))
        .with("theme", theme_instruction(translator, request.theme))
        .with("leftovers", leftovers);

    PromptSpec {
        task: Task::WeeklySkeleton,
        context: translator.text(TemplateKey::WeeklyPlanContext),
        system: translator.text(TemplateKey::WeeklyPlanSystem),
        user: translator.render(TemplateKey::WeeklyPlanUser, &args),
        schema: schema::weekly_skeleton().to_json(),
        temperature: WEEKLY_SKELETON_TEMPERATURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::BuiltinTranslator;
    use crate::types::{DinerCounts, Language};

    fn profile() -> UserProfile {
        UserProfile {
            id: "p1".to_string(),
            name: "Home".to_string(),
            diners: DinerCounts {
                adults_under_50: 2,
                ..DinerCounts::default()
            },
            forbidden_foods: vec!["peanuts".to_string()],
            prioritize_favorites: true,
        }
    }

    #[test]
    fn test_dislikes_come_first() {
        let signals = PreferenceSignals {
            favorites: vec!["Paella".to_string()],
            highly_rated: vec!["Gazpacho".to_string()],
            poorly_rated: vec!["Liver".to_string()],
        };
        let profile = profile();
        let spec = render_weekly_plan_prompt(
            &BuiltinTranslator::new(Language::En),
            &WeeklyPlanRequest {
                profile: &profile,
                length: CalendarLength::SevenDays,
                level: DifficultyLevel::Medium,
                theme: Theme::None,
                leftovers: false,
                signals: &signals,
            },
        );

        let hate = spec.user.find("Liver").unwrap();
        let love = spec.user.find("Gazpacho").unwrap();
        let favorite = spec.user.find("Paella").unwrap();
        assert!(hate < love && love < favorite);
        assert!(spec.user.contains("HIGHEST PRIORITY"));
        assert!(spec.user.contains("peanuts"));
        assert_eq!(spec.temperature, 0.7);
        assert_eq!(spec.task, Task::WeeklySkeleton);
    }

    #[test]
    fn test_five_day_prompt_names_friday() {
        let profile = profile();
        let spec = render_weekly_plan_prompt(
            &BuiltinTranslator::new(Language::Es),
            &WeeklyPlanRequest {
                profile: &profile,
                length: CalendarLength::FiveDays,
                level: DifficultyLevel::Easy,
                theme: Theme::Mediterranean,
                leftovers: true,
                signals: &PreferenceSignals::default(),
            },
        );
        assert!(spec.user.contains("5 días"));
        assert!(spec.user.contains("Viernes"));
        assert!(spec.user.contains("MAGO DE LAS SOBRAS"));
        assert!(spec.user.contains("mediterránea"));
        assert!(!spec.user.contains("PRIORIDAD"));
        assert_eq!(spec.context, "generar el menú semanal");
    }
}
