//! Plan definitions - weekly workout schedule and daily diet

use chrono::{NaiveTime, Weekday};

#[derive(Debug, Clone)]
pub struct Exercise {
    pub name: &'static str,
    /// "3x12", "30 min", "3x30s"
    pub sets: &'static str,
    pub video: &'static str,
}

#[derive(Debug, Clone)]
pub struct WorkoutDay {
    pub day: Weekday,
    pub focus: &'static str,
    pub exercises: &'static [Exercise],
}

const fn ex(name: &'static str, sets: &'static str, video: &'static str) -> Exercise {
    Exercise { name, sets, video }
}

/// Monday to Sunday
pub static WORKOUT_PLAN: [WorkoutDay; 7] = [
    WorkoutDay {
        day: Weekday::Mon,
        focus: "Chest",
        exercises: &[
            ex("Push-ups", "3x12", "https://youtube.com/watch?v=IODxDxX7oi4"),
            ex("Chest Press", "3x10", "https://youtube.com/watch?v=SrqOu55lrYU"),
            ex("Incline Push-ups", "3x8", "https://youtube.com/watch?v=cfns5VzPiso"),
            ex("Chest Flyes", "3x12", "https://youtube.com/watch?v=eozdVDA78K0"),
            ex("Diamond Push-ups", "2x8", "https://youtube.com/watch?v=J0DnG1_S92I"),
            ex("Wall Push-ups", "2x15", "https://youtube.com/watch?v=R08gYyypGto"),
        ],
    },
    WorkoutDay {
        day: Weekday::Tue,
        focus: "Back",
        exercises: &[
            ex("Pull-ups", "3x8", "https://youtube.com/watch?v=eGo4IYlbE5g"),
            ex("Bent Over Rows", "3x10", "https://youtube.com/watch?v=fISDoIGsOTY"),
            ex("Superman", "3x12", "https://youtube.com/watch?v=z6PJMT2y8GQ"),
            ex("Reverse Flyes", "3x12", "https://youtube.com/watch?v=T9Y4o_BqC0A"),
            ex("Deadlifts", "3x8", "https://youtube.com/watch?v=op9kVnSso6Q"),
            ex("Lat Pulldowns", "3x10", "https://youtube.com/watch?v=CAwf7n6Luuc"),
        ],
    },
    WorkoutDay {
        day: Weekday::Wed,
        focus: "Legs",
        exercises: &[
            ex("Squats", "3x15", "https://youtube.com/watch?v=aclHkVaku9U"),
            ex("Lunges", "3x12", "https://youtube.com/watch?v=QE6E5oWFWZs"),
            ex("Calf Raises", "3x20", "https://youtube.com/watch?v=gwLzBJYoWlI"),
            ex("Wall Sits", "3x30s", "https://youtube.com/watch?v=y-wV4Venusw"),
            ex("Leg Raises", "3x12", "https://youtube.com/watch?v=JB2oyawG9KI"),
            ex("Glute Bridges", "3x15", "https://youtube.com/watch?v=OUgsJ8-Vi0E"),
        ],
    },
    WorkoutDay {
        day: Weekday::Thu,
        focus: "Arms",
        exercises: &[
            ex("Bicep Curls", "3x12", "https://youtube.com/watch?v=ykJmrZ5v0Oo"),
            ex("Tricep Dips", "3x10", "https://youtube.com/watch?v=6kALZikXxLc"),
            ex("Hammer Curls", "3x10", "https://youtube.com/watch?v=zC3nLlEvin4"),
            ex("Overhead Press", "3x8", "https://youtube.com/watch?v=M2rwvNhTOu0"),
            ex("Tricep Extensions", "3x12", "https://youtube.com/watch?v=nRiJVZDpdL0"),
            ex("Arm Circles", "2x20", "https://youtube.com/watch?v=3-8pOJ6W8Y8"),
        ],
    },
    WorkoutDay {
        day: Weekday::Fri,
        focus: "Shoulders",
        exercises: &[
            ex("Shoulder Press", "3x10", "https://youtube.com/watch?v=qEwKCR5JCog"),
            ex("Lateral Raises", "3x12", "https://youtube.com/watch?v=3VcKaXpzqRo"),
            ex("Front Raises", "3x10", "https://youtube.com/watch?v=qzaKesWKYJ4"),
            ex("Rear Delt Flyes", "3x12", "https://youtube.com/watch?v=T9Y4o_BqC0A"),
            ex("Pike Push-ups", "3x8", "https://youtube.com/watch?v=x1KoTALiKbs"),
            ex("Shrugs", "3x15", "https://youtube.com/watch?v=g6qbq4Lf1FI"),
        ],
    },
    WorkoutDay {
        day: Weekday::Sat,
        focus: "Full Body",
        exercises: &[
            ex("Burpees", "3x8", "https://youtube.com/watch?v=auBLPXO8Fww"),
            ex("Mountain Climbers", "3x20", "https://youtube.com/watch?v=kLh-uczlPLg"),
            ex("Plank", "3x30s", "https://youtube.com/watch?v=pSHjTRCQxIw"),
            ex("Jumping Jacks", "3x30", "https://youtube.com/watch?v=c4DAnQ6DtF8"),
            ex("High Knees", "3x20", "https://youtube.com/watch?v=8opcQdC-V-U"),
            ex("Russian Twists", "3x20", "https://youtube.com/watch?v=wkD8rjkodUI"),
        ],
    },
    WorkoutDay {
        day: Weekday::Sun,
        focus: "Cardio",
        exercises: &[
            ex("Walking", "30 min", "https://youtube.com/watch?v=9FQM82h5ovI"),
            ex("Jogging", "15 min", "https://youtube.com/watch?v=Cg2ZKxPH8dE"),
            ex("Jump Rope", "3x2min", "https://youtube.com/watch?v=1BZM2Vre5oc"),
            ex("Stair Climbing", "10 min", "https://youtube.com/watch?v=qLp36gEal5M"),
            ex("Dancing", "20 min", "https://youtube.com/watch?v=gC_L9qAHVJ8"),
            ex("Stretching", "10 min", "https://youtube.com/watch?v=g_tea8ZNk5A"),
        ],
    },
];

pub fn workout_for(day: Weekday) -> &'static WorkoutDay {
    &WORKOUT_PLAN[day.num_days_from_monday() as usize]
}

/// Parse "mon", "Monday", "tue", ...
pub fn parse_weekday(s: &str) -> Option<Weekday> {
    s.trim().parse::<Weekday>().ok()
}

impl WorkoutDay {
    pub fn format(&self) -> String {
        let mut lines = vec![format!("{} - {}", self.day, self.focus)];
        for (i, e) in self.exercises.iter().enumerate() {
            lines.push(format!("{}. {:20} {:>7}  {}", i + 1, e.name, e.sets, e.video));
        }
        lines.join("\n")
    }
}

#[derive(Debug, Clone)]
pub struct FoodItem {
    pub food: &'static str,
    pub quantity: &'static str,
    pub calories: u32,
}

#[derive(Debug, Clone)]
pub struct Meal {
    /// 24h "HH:MM"
    pub time: &'static str,
    pub name: &'static str,
    pub items: &'static [FoodItem],
}

const fn food(food: &'static str, quantity: &'static str, calories: u32) -> FoodItem {
    FoodItem { food, quantity, calories }
}

pub static DIET_PLAN: [Meal; 7] = [
    Meal {
        time: "05:15",
        name: "Pre-Workout",
        items: &[food("Banana", "1 medium", 105), food("Black Coffee", "1 cup", 5)],
    },
    Meal {
        time: "07:30",
        name: "Post-Workout",
        items: &[food("Protein Shake", "1 scoop", 120), food("Almonds", "10 pieces", 70)],
    },
    Meal {
        time: "08:00",
        name: "Breakfast",
        items: &[
            food("Oatmeal", "1 cup", 150),
            food("Berries", "1/2 cup", 40),
            food("Greek Yogurt", "1/2 cup", 100),
        ],
    },
    Meal {
        time: "11:00",
        name: "School Snack",
        items: &[food("Apple", "1 medium", 80), food("Peanut Butter", "1 tbsp", 95)],
    },
    Meal {
        time: "13:30",
        name: "Lunch",
        items: &[
            food("Grilled Chicken", "100g", 165),
            food("Brown Rice", "1/2 cup", 110),
            food("Mixed Vegetables", "1 cup", 50),
            food("Salad", "1 cup", 20),
        ],
    },
    Meal {
        time: "16:30",
        name: "Evening Snack",
        items: &[food("Carrot Sticks", "1 cup", 50), food("Hummus", "2 tbsp", 70)],
    },
    Meal {
        time: "20:00",
        name: "Dinner",
        items: &[
            food("Grilled Fish", "100g", 180),
            food("Quinoa", "1/2 cup", 110),
            food("Steamed Broccoli", "1 cup", 55),
            food("Green Salad", "1 cup", 15),
        ],
    },
];

impl Meal {
    pub fn calories(&self) -> u32 {
        self.items.iter().map(|i| i.calories).sum()
    }

    pub fn start(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(self.time, "%H:%M").ok()
    }
}

pub fn total_calories() -> u32 {
    DIET_PLAN.iter().map(Meal::calories).sum()
}

/// Next meal at or after `now`; wraps to the first meal of the next day
pub fn current_meal_index(now: NaiveTime) -> usize {
    DIET_PLAN
        .iter()
        .position(|m| m.start().is_some_and(|t| now <= t))
        .unwrap_or(0)
}

pub fn format_diet(now: NaiveTime) -> String {
    let current = current_meal_index(now);
    let mut lines = vec![format!("Daily target: {} cal, {} meals", total_calories(), DIET_PLAN.len())];

    for (i, meal) in DIET_PLAN.iter().enumerate() {
        let marker = if i == current { "▶" } else { " " };
        lines.push(format!("{} {} {} ({} cal)", marker, meal.time, meal.name, meal.calories()));
        for item in meal.items {
            lines.push(format!("      {} - {} ({} cal)", item.food, item.quantity, item.calories));
        }
    }

    lines.join("\n")
}
