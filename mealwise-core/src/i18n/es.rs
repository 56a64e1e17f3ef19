use super::{Template, TemplateArgs, TemplateKey};
use crate::types::{MealSlot, Weekday};

pub(super) fn template(key: TemplateKey) -> Template {
    use Template::{Render, Text};

    match key {
        TemplateKey::ApiKeyMissing => Text("La clave de la API de generación no está configurada."),
        TemplateKey::RateLimitError => Text(
            "Se ha excedido el límite de peticiones a la API. Espera unos minutos y vuelve a intentarlo.",
        ),
        TemplateKey::EmptyResponseError => Render(|a: &TemplateArgs| {
            format!(
                "La IA no generó contenido al {}. La respuesta estaba vacía.",
                a.get("context")
            )
        }),
        TemplateKey::GenericApiError => Render(|a: &TemplateArgs| {
            format!(
                "Ocurrió un error inesperado al {}. Inténtalo de nuevo.",
                a.get("context")
            )
        }),
        TemplateKey::StorageError => Text("No se pudieron guardar tus datos localmente."),
        TemplateKey::RetryNotice => Render(|a: &TemplateArgs| {
            format!(
                "Límite de peticiones alcanzado. Reintentando en {} segundos...",
                a.get("seconds")
            )
        }),
        TemplateKey::CalendarNameEmpty => Text("El nombre del menú no puede estar vacío."),
        TemplateKey::CalendarNameExists => Render(|a: &TemplateArgs| {
            format!("Ya existe un menú con el nombre \"{}\".", a.get("name"))
        }),
        TemplateKey::NoActiveProfile => Text("Por favor, selecciona un perfil primero."),
        TemplateKey::RatingOutOfRange => Render(|a: &TemplateArgs| {
            format!("Valoración {} no válida. Debe estar entre 1 y 5.", a.get("value"))
        }),
        TemplateKey::ProfileNameEmpty => Text("El nombre del perfil es obligatorio."),
        TemplateKey::TooManyProfiles => Render(|a: &TemplateArgs| {
            format!("Puedes crear como máximo {} perfiles.", a.get("max"))
        }),
        TemplateKey::UnknownProfile => Text("No se encontró el perfil asociado a este menú."),
        TemplateKey::UnknownCalendar => Text("Ese menú ya no existe."),
        TemplateKey::SlotUnavailable => Text("Esa comida no se puede cambiar ahora mismo."),

        TemplateKey::WeeklyPlanContext => Text("generar el menú semanal"),
        TemplateKey::RecipeContext => Render(|a: &TemplateArgs| {
            format!("generar la receta para \"{}\"", a.get("name"))
        }),
        TemplateKey::RecipeBatchContext => {
            Render(|a: &TemplateArgs| format!("generar {} recetas", a.get("count")))
        }
        TemplateKey::ShoppingListContext => Text("generar la lista de la compra"),
        TemplateKey::RescueContext => Text("generar una receta en modo rescate"),
        TemplateKey::QuickIdeasContext => {
            Render(|a: &TemplateArgs| format!("generar ideas para {}", a.get("meal_type")))
        }
        TemplateKey::SuggestionsContext => Render(|a: &TemplateArgs| {
            format!("generar sugerencias para \"{}\"", a.get("name"))
        }),

        TemplateKey::None => Text("ninguno"),
        TemplateKey::DayName(day) => Text(match day {
            Weekday::Monday => "Lunes",
            Weekday::Tuesday => "Martes",
            Weekday::Wednesday => "Miércoles",
            Weekday::Thursday => "Jueves",
            Weekday::Friday => "Viernes",
            Weekday::Saturday => "Sábado",
            Weekday::Sunday => "Domingo",
        }),
        TemplateKey::SlotName(slot) => Text(match slot {
            MealSlot::Breakfast => "desayuno",
            MealSlot::MorningSnack => "almuerzo de media mañana",
            MealSlot::Lunch => "comida",
            MealSlot::AfternoonSnack => "merienda",
            MealSlot::Dinner => "cena",
        }),
        TemplateKey::DinerBreakdown => Render(|a: &TemplateArgs| {
            format!(
                "Niños (2-7): {}, Niños (7-14): {}, Adultos (14-50): {}, Adultos (+50): {}",
                a.get("toddlers"),
                a.get("kids"),
                a.get("adults_under_50"),
                a.get("adults_50_plus")
            )
        }),
        TemplateKey::DifficultyEasy => Text("Todas las recetas deben ser de nivel 'Easy' (fácil)."),
        TemplateKey::DifficultyMedium => Text(
            "Combina recetas 'Easy' (fácil) y 'Medium' (media). NO incluyas recetas 'Chef'. \
             Usa platos sencillos en desayunos y tentempiés.",
        ),
        TemplateKey::DifficultyChef => Text(
            "Se admiten todos los niveles: 'Easy', 'Medium' y 'Chef'. Puedes incluir platos \
             'Chef' más exigentes, sobre todo en cenas, equilibrados con comidas sencillas.",
        ),
        TemplateKey::ThemeComfort => Text(
            "TEMÁTICA: \"Comida reconfortante\". Platos caseros, cálidos y contundentes como \
             guisos, cremas, pasta y asados.",
        ),
        TemplateKey::ThemeLight => Text(
            "TEMÁTICA: \"Ligera y saludable\". Ensaladas, verduras, proteínas magras y cocciones \
             a la plancha, al vapor o al horno. Evita fritos y salsas pesadas.",
        ),
        TemplateKey::ThemeMediterranean => Text(
            "TEMÁTICA: \"Cocina mediterránea\". Aceite de oliva, verduras frescas, legumbres, \
             pescado y cereales integrales.",
        ),
        TemplateKey::ThemeQuick => Text(
            "TEMÁTICA: \"Rápida\". Todas las recetas deben prepararse en menos de 30 minutos y \
             con pocos pasos.",
        ),
        TemplateKey::LeftoverHint => Text(
            "MAGO DE LAS SOBRAS: planifica las cenas para que sus sobras se reutilicen en la \
             comida del día siguiente (p. ej. pollo asado y después tacos de pollo). Puedes \
             indicarlo en el nombre, como \"Tacos de pollo (sobras del asado)\".",
        ),
        TemplateKey::FavoritesHint => Render(|a: &TemplateArgs| {
            format!(
                "PRIORITARIO: incluye algunas de las recetas favoritas del usuario donde encajen: {}.",
                a.get("recipes")
            )
        }),
        TemplateKey::HighlyRatedHint => Render(|a: &TemplateArgs| {
            format!(
                "PRIORIDAD ALTA: al usuario le ENCANTAN estas recetas (4-5 estrellas). Incluye \
                 algunas o platos muy parecidos: {}.",
                a.get("recipes")
            )
        }),
        TemplateKey::PoorlyRatedHint => Render(|a: &TemplateArgs| {
            format!(
                "PRIORIDAD MÁXIMA: el usuario ODIA estas recetas (1-2 estrellas). No incluyas \
                 nunca estas recetas ni nada que se les parezca: {}.",
                a.get("recipes")
            )
        }),
        TemplateKey::CategoryOther => Text("Otros"),

        TemplateKey::WeeklyPlanSystem => Text(
            "Actúa como un chef experto y nutricionista. Crea un plan de comidas semanal \
             variado, equilibrado y delicioso para el hogar del usuario. Responde SIEMPRE en \
             JSON usando el schema proporcionado. Los nombres de los platos deben ser \
             atractivos y descriptivos.",
        ),
        TemplateKey::WeeklyPlanUser => Render(|a: &TemplateArgs| {
            format!(
                "Genera solo los NOMBRES de los platos de un plan de {days} días (de Lunes a \
                 {end_day}) en español. NO incluyas las recetas.\n\n\
                 {hints}\n\
                 Hogar:\n\
                 - Comensales: {diners}\n\
                 - Alimentos prohibidos (no los uses nunca): {forbidden}\n\
                 - Dificultad: {difficulty}\n\
                 {theme}\n\
                 {leftovers}",
                days = a.get("days"),
                end_day = a.get("end_day"),
                hints = a.get("hints"),
                diners = a.get("diners"),
                forbidden = a.get("forbidden"),
                difficulty = a.get("difficulty"),
                theme = a.get("theme"),
                leftovers = a.get("leftovers"),
            )
        }),
        TemplateKey::RecipeSystem => Text(
            "Actúa como un chef experto. Escribe recetas detalladas y deliciosas. Responde \
             SIEMPRE en JSON usando el schema. Clasifica la complejidad como 'Easy' (pocos \
             pasos, técnica básica), 'Medium' (varias elaboraciones) o 'Chef' (técnica \
             avanzada o preparación larga). Escribe la receta en español.",
        ),
        TemplateKey::RecipeUser => Render(|a: &TemplateArgs| {
            format!(
                "Escribe una receta para el plato \"{name}\".\n\
                 - Comensales: {diners}\n\
                 - Alimentos prohibidos (no los uses nunca): {forbidden}\n\
                 - Nivel de dificultad: {level}\n\
                 Ajusta las cantidades a los comensales.",
                name = a.get("name"),
                diners = a.get("diners"),
                forbidden = a.get("forbidden"),
                level = a.get("level"),
            )
        }),
        TemplateKey::RecipeBatchUser => Render(|a: &TemplateArgs| {
            format!(
                "Escribe una receta para CADA UNO de los siguientes platos:\n{meals}\n\n\
                 - Comensales: {diners}\n\
                 - Alimentos prohibidos (no los uses nunca): {forbidden}\n\
                 - Nivel de dificultad: {level}\n\
                 Devuelve una entrada por plato y copia el nombre exacto en \"mealName\".",
                meals = a.get("meals"),
                diners = a.get("diners"),
                forbidden = a.get("forbidden"),
                level = a.get("level"),
            )
        }),
        TemplateKey::ShoppingListSystem => Text(
            "Actúa como un asistente de compras extremadamente eficiente. Consolida la lista \
             de ingredientes, asigna cada uno a una categoría de supermercado y devuelve una \
             lista de la compra limpia. Responde SIEMPRE en JSON. Las categorías deben estar \
             en español.",
        ),
        TemplateKey::ShoppingListUser => Render(|a: &TemplateArgs| {
            format!(
                "Crea una lista de la compra con los ingredientes de este menú semanal. Une los \
                 ingredientes duplicados sumando sus cantidades. Responde solo con el array JSON.\n\n{}",
                a.get("ingredients")
            )
        }),
        TemplateKey::RescueSystem => Text(
            "Actúa como un chef creativo y resolutivo. Crea una receta factible usando \
             ÚNICAMENTE los ingredientes que indica el usuario, más básicos como aceite, sal, \
             pimienta y agua. Escríbela en español. Responde SIEMPRE en JSON.",
        ),
        TemplateKey::RescueUser => Render(|a: &TemplateArgs| {
            format!(
                "Tengo estos ingredientes: {}. Crea una receta completa con un nombre creativo.",
                a.get("ingredients")
            )
        }),
        TemplateKey::QuickIdeasSystem => Text(
            "Actúa como un generador de ideas de cocina rápido y creativo. Sugiere 3 ideas de \
             recetas sencillas, cada una con un nombre y una descripción breve y apetecible \
             (1-2 frases). Escribe en español. Responde SIEMPRE en JSON.",
        ),
        TemplateKey::QuickIdeasUser => Render(|a: &TemplateArgs| {
            format!(
                "Necesito 3 ideas rápidas para el {}. Devuélvelas como un array JSON de objetos \
                 con \"name\" y \"description\".",
                a.get("meal_type")
            )
        }),
        TemplateKey::SuggestionSystem => Text(
            "Eres un asistente experto en planificación de menús. Sugiere 3 platos alternativos \
             que aporten variedad, sobre todo de proteínas, a un menú semanal sin repetir lo \
             que ya está planificado. Responde SIEMPRE en JSON.",
        ),
        TemplateKey::SuggestionUser => Render(|a: &TemplateArgs| {
            format!(
                "Quiero 3 alternativas para \"{original}\", que es un/a {slot}. Deben ser \
                 realmente diferentes, variar la proteína (pescado, carne roja, legumbres...) y \
                 no repetir ingredientes principales de otros platos.\n\
                 - Comensales: {diners}\n\
                 - Alimentos prohibidos (no los uses nunca): {forbidden}\n\
                 - Nivel de dificultad: {level}\n\
                 {theme}\n\
                 - Platos ya presentes en el menú (no repetir): {existing}",
                original = a.get("original"),
                slot = a.get("slot"),
                diners = a.get("diners"),
                forbidden = a.get("forbidden"),
                level = a.get("level"),
                theme = a.get("theme"),
                existing = a.get("existing"),
            )
        }),
    }
}
