use crate::models::{
    Achievement, AchievementCategory, Difficulty, Lesson, LessonCategory, Rarity, Requirement,
};

fn achievement(
    id: &str,
    title: &str,
    description: &str,
    icon: &str,
    rarity: Rarity,
    category: AchievementCategory,
    requirement: Requirement,
    xp_reward: u32,
) -> Achievement {
    Achievement {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        rarity,
        category,
        requirement,
        xp_reward,
    }
}

/// The built-in achievement catalog. The evaluator takes any slice of
/// achievements; this is the set the CLI ships with.
pub fn achievement_catalog() -> Vec<Achievement> {
    use AchievementCategory as Cat;

    vec![
        achievement(
            "first-steps",
            "First Steps",
            "Complete your first lesson",
            "🌱",
            Rarity::Common,
            Cat::Completion,
            Requirement::Completion { count: 1 },
            25,
        ),
        achievement(
            "on-a-roll",
            "On a Roll",
            "Keep a 3-day streak alive",
            "🔥",
            Rarity::Common,
            Cat::Streak,
            Requirement::Streak { days: 3 },
            50,
        ),
        achievement(
            "week-warrior",
            "Week Warrior",
            "Keep a 7-day streak alive",
            "⚡",
            Rarity::Rare,
            Cat::Streak,
            Requirement::Streak { days: 7 },
            100,
        ),
        achievement(
            "fortnight-focus",
            "Fortnight Focus",
            "Keep a 14-day streak alive",
            "🌟",
            Rarity::Epic,
            Cat::Streak,
            Requirement::Streak { days: 14 },
            200,
        ),
        achievement(
            "unstoppable",
            "Unstoppable",
            "Keep a 30-day streak alive",
            "🏆",
            Rarity::Legendary,
            Cat::Streak,
            Requirement::Streak { days: 30 },
            500,
        ),
        achievement(
            "getting-serious",
            "Getting Serious",
            "Complete 10 lessons",
            "📚",
            Rarity::Rare,
            Cat::Completion,
            Requirement::Completion { count: 10 },
            100,
        ),
        achievement(
            "past-halfway",
            "Past Halfway",
            "Complete 20 lessons",
            "🎯",
            Rarity::Epic,
            Cat::Completion,
            Requirement::Completion { count: 20 },
            200,
        ),
        achievement(
            "course-conqueror",
            "Course Conqueror",
            "Complete all 30 lessons",
            "👑",
            Rarity::Legendary,
            Cat::Completion,
            Requirement::Completion { count: 30 },
            500,
        ),
        achievement(
            "perfectionist",
            "Perfectionist",
            "Score 100% on 5 quizzes",
            "💯",
            Rarity::Rare,
            Cat::Quiz,
            Requirement::QuizScore { perfect_count: 5 },
            150,
        ),
        achievement(
            "flawless",
            "Flawless",
            "Score 100% on 15 quizzes",
            "💎",
            Rarity::Epic,
            Cat::Quiz,
            Requirement::QuizScore { perfect_count: 15 },
            300,
        ),
        achievement(
            "speed-learner",
            "Speed Learner",
            "Finish a lesson in 5 minutes or less",
            "🚀",
            Rarity::Rare,
            Cat::Speed,
            Requirement::Speed { minutes: 5 },
            100,
        ),
        achievement(
            "early-bird",
            "Early Bird",
            "Finish a lesson between 5 and 8 in the morning",
            "🌅",
            Rarity::Rare,
            Cat::Special,
            Requirement::Time {
                start_hour: 5,
                end_hour: 8,
            },
            100,
        ),
        achievement(
            "night-owl",
            "Night Owl",
            "Finish a lesson after 10 in the evening",
            "🦉",
            Rarity::Rare,
            Cat::Special,
            Requirement::Time {
                start_hour: 22,
                end_hour: 23,
            },
            100,
        ),
        achievement(
            "foundation-laid",
            "Foundation Laid",
            "Complete every fundamentals lesson",
            "🧱",
            Rarity::Epic,
            Cat::Category,
            Requirement::CategoryComplete {
                category: LessonCategory::Fundamentals,
            },
            250,
        ),
    ]
}

fn lesson(
    id: u32,
    title: &str,
    category: LessonCategory,
    difficulty: Difficulty,
    estimated_time: u32,
) -> Lesson {
    Lesson {
        id,
        title: title.to_string(),
        category,
        difficulty,
        estimated_time,
    }
}

/// The 30-day curriculum. Static display data for the CLI; the progress
/// engine itself only ever sees lesson ids.
pub fn lesson_catalog() -> Vec<Lesson> {
    use Difficulty::{Advanced, Beginner, Intermediate};
    use LessonCategory as Cat;

    vec![
        lesson(1, "What Is AI, Really?", Cat::Fundamentals, Beginner, 15),
        lesson(2, "Machine Learning Basics", Cat::Fundamentals, Beginner, 20),
        lesson(3, "Training Data and Labels", Cat::Fundamentals, Beginner, 20),
        lesson(4, "Neural Networks From Scratch", Cat::Fundamentals, Beginner, 25),
        lesson(5, "Loss, Gradients, and Learning", Cat::Fundamentals, Intermediate, 25),
        lesson(6, "Overfitting and Generalization", Cat::Fundamentals, Intermediate, 20),
        lesson(7, "From Text to Tokens", Cat::Llms, Beginner, 15),
        lesson(8, "Word Embeddings", Cat::Llms, Intermediate, 20),
        lesson(9, "Attention Is All You Need", Cat::Llms, Intermediate, 30),
        lesson(10, "How Transformers Work", Cat::Llms, Intermediate, 30),
        lesson(11, "Pretraining and Fine-Tuning", Cat::Llms, Intermediate, 25),
        lesson(12, "Sampling and Temperature", Cat::Llms, Intermediate, 20),
        lesson(13, "Prompt Engineering", Cat::Applications, Beginner, 20),
        lesson(14, "Retrieval-Augmented Generation", Cat::Applications, Intermediate, 25),
        lesson(15, "AI for Code", Cat::Applications, Intermediate, 20),
        lesson(16, "Vision Models", Cat::Applications, Intermediate, 25),
        lesson(17, "Speech and Audio", Cat::Applications, Intermediate, 20),
        lesson(18, "Agents and Tool Use", Cat::Applications, Advanced, 30),
        lesson(19, "Scaling Laws", Cat::Advanced, Advanced, 25),
        lesson(20, "Mixture of Experts", Cat::Advanced, Advanced, 25),
        lesson(21, "Reinforcement Learning from Feedback", Cat::Advanced, Advanced, 30),
        lesson(22, "Model Evaluation", Cat::Advanced, Advanced, 25),
        lesson(23, "Interpretability", Cat::Advanced, Advanced, 30),
        lesson(24, "Bias in Training Data", Cat::Ethics, Intermediate, 20),
        lesson(25, "Hallucination and Trust", Cat::Ethics, Intermediate, 20),
        lesson(26, "AI Safety and Alignment", Cat::Ethics, Intermediate, 25),
        lesson(27, "Building with AI APIs", Cat::Practical, Intermediate, 30),
        lesson(28, "Running Models Locally", Cat::Practical, Intermediate, 25),
        lesson(29, "Shipping an AI Feature", Cat::Practical, Advanced, 30),
        lesson(30, "Your AI Roadmap", Cat::Practical, Beginner, 15),
    ]
}
