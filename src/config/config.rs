use serde::Deserialize;

use crate::llm::models::GenerationConfig;

pub const DEFAULT_OPENING_PROMPT: &str = "You are a dungeon master operating a role playing game for the user. \
'story' will contain your text responses. You will always provide two potential options for the user in every \
response, in 'firstoption' and 'secondoption'. For example: 'Search your surroundings for clues'. Do not include \
these options in 'story'. Start by creating a blank player with 100 hp and prompting the player with 'Welcome, \
adventurer! You stand at the crossroads, your journey yet unwritten. What kind of story do you want to embark on? \
A tale of daring heroism? A quest for ancient artifacts? A dark and perilous descent into the underworld? Tell me \
your choice!'. From then on you will narrate the story and keep track of the player data.";

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// The single browser origin allowed to call the relay.
    pub allowed_origin: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeminiConfig {
    #[serde(default = "default_gemini_base")]
    pub api_base: String,
    pub api_key: String,
    #[serde(default = "default_gemini_model")]
    pub model: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OpenAiConfig {
    pub api_base: String,
    pub api_key: String,
    pub model: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    pub provider: String,
    pub request_timeout_secs: Option<u64>,
    pub gemini: Option<GeminiConfig>,
    pub openai: Option<OpenAiConfig>,
    pub ollama: Option<OllamaConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GameConfig {
    #[serde(default = "default_opening_prompt")]
    pub opening_prompt: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            opening_prompt: default_opening_prompt(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub game: GameConfig,
}

impl AppConfig {
    pub fn load(path: &str) -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();

        let settings = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("llm.provider", "gemini")?
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("STORYRELAY").separator("__"))
            .build()?;

        let mut app_config: AppConfig = settings.try_deserialize()?;

        // Secrets may be written as ${VAR} in the file
        app_config.server.host = expand_env(&app_config.server.host);
        if let Some(ref mut gemini) = app_config.llm.gemini {
            gemini.api_key = expand_env(&gemini.api_key);
        }
        if let Some(ref mut openai) = app_config.llm.openai {
            openai.api_key = expand_env(&openai.api_key);
        }

        Ok(app_config)
    }
}

fn default_gemini_base() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_opening_prompt() -> String {
    DEFAULT_OPENING_PROMPT.to_string()
}

fn expand_env(val: &str) -> String {
    match val.strip_prefix("${").and_then(|rest| rest.strip_suffix('}')) {
        Some(var_name) => std::env::var(var_name).unwrap_or_default(),
        None => val.to_string(),
    }
}
