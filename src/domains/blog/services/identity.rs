// 처음 가입하는 사용자를 위한 이름/아바타 생성
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use url::Url;
use utoipa::ToSchema;

const AVATAR_BASE_URL: &str = "https://api.dicebear.com/7.x/adventurer/svg";

const ADJECTIVES: &[&str] = &[
    "Brave", "Calm", "Clever", "Cosmic", "Curious", "Eager", "Fuzzy", "Gentle", "Happy", "Jolly",
    "Lucky", "Mellow", "Nimble", "Quiet", "Rapid", "Shiny", "Silent", "Sunny", "Swift", "Witty",
];

const NOUNS: &[&str] = &[
    "Badger", "Comet", "Falcon", "Fox", "Gecko", "Heron", "Koala", "Lynx", "Maple", "Meteor",
    "Otter", "Owl", "Panda", "Pebble", "Raven", "River", "Sparrow", "Tiger", "Walrus", "Willow",
];

/// 표시 이름 + 아바타 URL
/// Display name and avatar URL submitted with init_user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Profile {
    #[schema(example = "Brave Otter")]
    pub name: String,
    #[schema(example = "https://api.dicebear.com/7.x/adventurer/svg?seed=Brave+Otter")]
    pub avatar: String,
}

impl Profile {
    pub fn new(name: impl Into<String>, avatar: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            avatar: avatar.into(),
        }
    }

    /// 랜덤 이름과 그 이름으로 만든 아바타
    pub fn random() -> Self {
        let name = random_name();
        let avatar = avatar_url(&name);
        Self { name, avatar }
    }
}

/// "형용사 명사" 형태의 랜덤 이름
/// Random "Adjective Noun" display name
pub fn random_name() -> String {
    let mut rng = rand::thread_rng();
    let adjective = ADJECTIVES.choose(&mut rng).copied().unwrap_or("Anonymous");
    let noun = NOUNS.choose(&mut rng).copied().unwrap_or("Writer");
    format!("{} {}", adjective, noun)
}

/// 이름을 seed로 쓰는 아바타 URL (같은 이름 → 같은 URL)
/// Deterministic avatar URL seeded by the name
pub fn avatar_url(name: &str) -> String {
    match Url::parse_with_params(AVATAR_BASE_URL, &[("seed", name)]) {
        Ok(url) => url.to_string(),
        Err(_) => AVATAR_BASE_URL.to_string(),
    }
}
