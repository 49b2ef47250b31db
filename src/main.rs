mod config;
mod quiz;

use std::sync::Arc;

use dotenv::dotenv;
use log::{info, warn};
use quiz::{answer_label, pressed_answer, shuffled_answers, Quiz, QuizDefinition, QuizError};
use teloxide::{
    dispatching::dialogue::{serializer::Json, ErasedStorage, SqliteStorage, Storage},
    prelude::*,
    types::{KeyboardButton, KeyboardMarkup},
};

type QuizDialogue = Dialogue<State, ErasedStorage<State>>;
type BoxError = Box<dyn std::error::Error + Send + Sync>;
type HandlerResult = Result<(), BoxError>;

#[derive(Clone, Default, serde::Serialize, serde::Deserialize)]
pub enum State {
    #[default]
    Start,
    ReceiveStart,
    InQuiz {
        quiz: Quiz,
        // original answer indices in the order the buttons were shown
        order: Vec<usize>,
    },
}

type QuizStorage = std::sync::Arc<ErasedStorage<State>>;

/// What every handler needs besides the dialogue: the quiz itself and how to present it.
#[derive(Clone)]
struct QuizContext {
    definition: Arc<QuizDefinition>,
    shuffle_answers: bool,
}

#[tokio::main]
async fn main() -> HandlerResult {
    let dotenv_loaded = dotenv().is_ok();

    pretty_env_logger::init();
    info!("Starting quiz bot...");
    if !dotenv_loaded {
        info!("No .env file, using the process environment");
    }

    let config = config::Config::from_env()?;

    info!("Loading the quiz from {}", config.quiz_file.display());
    let definition = QuizDefinition::open(&config.quiz_file)?;
    if !Quiz::validate(&definition) {
        return Err(QuizError::InvalidStructure.into());
    }
    info!("Quiz loaded: {} questions", definition.questions.len());

    let bot = Bot::from_env();

    info!("Opening the dialogue storage at {}", config.storage_path);
    let storage: QuizStorage = SqliteStorage::open(&config.storage_path, Json)
        .await?
        .erase();

    let context = QuizContext {
        definition: Arc::new(definition),
        shuffle_answers: config.shuffle_answers,
    };
    let start_context = context.clone();
    let receive_start_context = context.clone();
    let answer_context = context;

    Dispatcher::builder(
        bot,
        Update::filter_message()
            .enter_dialogue::<Message, ErasedStorage<State>, State>()
            .branch(dptree::case![State::Start].endpoint(
                move |bot: Bot, dialogue: QuizDialogue, msg: Message| {
                    start(start_context.clone(), bot, dialogue, msg)
                },
            ))
            .branch(dptree::case![State::ReceiveStart].endpoint(
                move |bot: Bot, dialogue: QuizDialogue, msg: Message| {
                    receive_start(receive_start_context.clone(), bot, dialogue, msg)
                },
            ))
            .branch(dptree::case![State::InQuiz { quiz, order }].endpoint(
                move |bot: Bot,
                      dialogue: QuizDialogue,
                      (quiz, order): (Quiz, Vec<usize>),
                      msg: Message| {
                    receive_answer(answer_context.clone(), bot, dialogue, (quiz, order), msg)
                },
            )),
    )
    .dependencies(dptree::deps![storage])
    .enable_ctrlc_handler()
    .build()
    .dispatch()
    .await;

    Ok(())
}

const DEFAULT_TITLE: &str = "Quiz time!";
const START_BUTTON: &str = "⭐ Start";
const AGAIN_BUTTON: &str = "🔁 Again";

fn single_button(text: &str) -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![KeyboardButton::new(text)]])
}

async fn start(context: QuizContext, bot: Bot, dialogue: QuizDialogue, msg: Message) -> HandlerResult {
    let definition = &context.definition;
    let mut text = definition
        .title
        .clone()
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());
    if let Some(description) = &definition.short_description {
        text.push_str("\n\n");
        text.push_str(description);
    }

    bot.send_message(msg.chat.id, text)
        .reply_markup(single_button(START_BUTTON))
        .await?;

    dialogue.update(State::ReceiveStart).await?;
    Ok(())
}

async fn receive_start(
    context: QuizContext,
    bot: Bot,
    dialogue: QuizDialogue,
    msg: Message,
) -> HandlerResult {
    match msg.text() {
        Some(START_BUTTON) | Some(AGAIN_BUTTON) => {}
        _ => {
            bot.send_message(msg.chat.id, "Press the button to start the quiz")
                .reply_markup(single_button(START_BUTTON))
                .await?;
            return Ok(());
        }
    }

    let mut quiz = Quiz::from_questions(context.definition.questions.clone())?;
    quiz.start();
    let order = send_question(&bot, msg.chat.id, &quiz, context.shuffle_answers).await?;

    dialogue.update(State::InQuiz { quiz, order }).await?;
    Ok(())
}

async fn receive_answer(
    context: QuizContext,
    bot: Bot,
    dialogue: QuizDialogue,
    (mut quiz, order): (Quiz, Vec<usize>),
    msg: Message,
) -> HandlerResult {
    let question = match quiz.current_question() {
        Some(question) => question.clone(),
        // stored quizzes are always started, but don't get stuck if one isn't
        None => return start(context, bot, dialogue, msg).await,
    };

    let answer_index = match msg
        .text()
        .and_then(|text| pressed_answer(&question, &order, text))
    {
        Some(index) => index,
        None => {
            warn!("Chat {}: answer is not one of the options", msg.chat.id.0);
            bot.send_message(msg.chat.id, "Please choose one of the answers")
                .await?;
            return Ok(());
        }
    };

    if quiz.check(answer_index as i64) {
        bot.send_message(msg.chat.id, "Correct!").await?;
    } else {
        let correct_answer = question.correct_answer().unwrap_or_default();
        bot.send_message(
            msg.chat.id,
            format!("Wrong! The correct answer is {}", correct_answer),
        )
        .await?;
    }

    if quiz.next() {
        let order = send_question(&bot, msg.chat.id, &quiz, context.shuffle_answers).await?;
        dialogue.update(State::InQuiz { quiz, order }).await?;
        return Ok(());
    }

    send_result(&bot, msg.chat.id, &quiz).await?;
    dialogue.update(State::ReceiveStart).await?;
    Ok(())
}

/// Sends the current question and returns the order its answers were shown in.
async fn send_question(
    bot: &Bot,
    chat_id: ChatId,
    quiz: &Quiz,
    shuffle: bool,
) -> Result<Vec<usize>, BoxError> {
    let (index, question) = match (quiz.current_index(), quiz.current_question()) {
        (Some(index), Some(question)) => (index, question),
        _ => return Err("the quiz has not been started".into()),
    };

    let answers = if shuffle {
        shuffled_answers(question, &mut rand::thread_rng())
    } else {
        question
            .answers
            .iter()
            .map(String::as_str)
            .enumerate()
            .collect()
    };

    let text = format!(
        "{}\n\nQuestion: {}/{}",
        question.text,
        index + 1,
        quiz.question_count()
    );

    let buttons = answers
        .iter()
        .enumerate()
        .map(|(position, (_, answer))| vec![KeyboardButton::new(answer_label(position, answer))])
        .collect::<Vec<_>>();

    bot.send_message(chat_id, text)
        .reply_markup(KeyboardMarkup::new(buttons))
        .await?;
    Ok(answers.iter().map(|(index, _)| *index).collect())
}

async fn send_result(bot: &Bot, chat_id: ChatId, quiz: &Quiz) -> HandlerResult {
    let verdict = if quiz.is_perfect() {
        "That's right! Well done!"
    } else {
        "You can do better!"
    };
    let text = format!(
        "{}\n\nScore: {} of {}",
        verdict,
        quiz.result(),
        quiz.max_score()
    );

    bot.send_message(chat_id, text)
        .reply_markup(single_button(AGAIN_BUTTON))
        .await?;
    Ok(())
}
